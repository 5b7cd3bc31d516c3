//! Pricing engine module for rental quotes.
//!
//! Pure price computation for cars and dresses (day counting, tiered and
//! date-based rates, add-ons, supplier adjustment) plus the HTTP/JSON
//! surface the back office calls for previews and stored-car quotes.

pub mod calculators;
pub mod labels;
pub mod models;
pub mod queries;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{add_on_cost, base_price, calculate_total_price, days, quote, round_money, Quote};
pub use models::{AddOn, AddOnPrice, RentableItem, RentalOptions, TierSchedule};
pub use routes::router;
pub use services::PricingError;
