mod auth;
mod helpers;
mod mocks;
mod notify;
mod orders;
mod vehicles;
