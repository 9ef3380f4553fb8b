pub mod energy;
pub mod master;
pub mod month;
pub mod quality;
pub mod region;
pub mod sources;
pub mod weather;
