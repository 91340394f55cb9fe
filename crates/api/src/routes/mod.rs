pub mod coingecko;
pub mod yahoo;
