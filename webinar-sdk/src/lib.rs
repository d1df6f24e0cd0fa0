//! Wire types shared between the webinar registration server and its
//! clients (landing page, admin dashboard, operator tooling).

pub mod objects;
