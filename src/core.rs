pub mod cycle;
pub mod mapper;
pub mod month;
pub mod portal;
pub mod reading;
pub mod records;
