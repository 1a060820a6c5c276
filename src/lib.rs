pub mod app;
pub mod config;
pub mod demo_seeder;
pub mod error;
pub mod api {
    pub mod errors;
    pub mod flights;
    pub mod params;
    pub mod passengers;
    pub mod reservations;
}
pub mod db {
    pub mod memory;
    pub mod models;
    pub mod repository;
}
pub mod rendering {
    pub mod templates;
}
pub mod search {
    pub mod form;
}
pub mod views {
    pub mod flights;
    pub mod home;
    pub mod passengers;
    pub mod reservations;
}
