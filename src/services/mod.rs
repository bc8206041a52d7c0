pub mod collector;
pub mod credentials;
pub mod latest;
pub mod movies;
pub mod people;
pub mod transport;
pub mod users;
