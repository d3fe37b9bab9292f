pub mod catalog;
pub mod recommender;
pub mod remote;

pub use catalog::{Catalog, CourseTable};
pub use recommender::{recommend, RecommendationResult};
pub use remote::{Recommender, RemoteRecommender};
