// brickstash: personal LEGO inventory service.
// One PostgreSQL table, a small REST API over it, a vendor image scraper,
// and an offline spreadsheet importer.

pub mod api;
pub mod images;
pub mod importer;
pub mod store;

pub mod util {
    pub mod env;
}
