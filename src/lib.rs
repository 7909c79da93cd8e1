pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod metrics;
pub mod state;

pub mod crypto {
    pub mod password;
    pub mod token;
}

pub mod models {
    pub mod chirp;
    pub mod session;
    pub mod user;
}

pub mod repositories {
    pub mod chirp;
    pub mod user;
}

pub mod services {
    pub mod auth;
    pub mod chirps;
}

pub mod handlers {
    pub mod admin;
    pub mod auth;
    pub mod chirps;
}

pub mod middleware_layer {
    pub mod auth;
    pub mod bearer;
    pub mod metrics;
}

pub mod validation {
    pub mod auth;
    pub mod chirp;
}
