//! API endpoint implementations.

pub mod asylum;
pub mod demographics;
pub mod population;
pub mod solutions;

pub use asylum::{AsylumApplicationsApi, AsylumDecisionsApi};
pub use demographics::DemographicsApi;
pub use population::PopulationApi;
pub use solutions::SolutionsApi;
