pub mod demand;
pub mod normalize;
pub mod protocol;
pub mod reporting;
