pub mod calendar;
pub mod company;
pub mod deck;
pub mod esg;
pub mod forecast;
pub mod fundamentals;
pub mod news;
pub mod price_point;
pub mod report;
