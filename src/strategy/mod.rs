pub mod baseline;
pub mod controller;
pub mod forecast;
pub mod params;
pub mod pid;
pub mod pipeline;
pub mod stabilizer;
pub mod traits;
