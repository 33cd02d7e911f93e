//! Client side of the admin pages: the popover form surface, the pizza radio
//! list and the HTTP client driving both against the server.

pub mod client;
pub mod error;
pub mod picker;
pub mod surface;

pub use client::{page_category_surface, AdminClient};
pub use error::ClientError;
pub use picker::PizzaPicker;
pub use surface::{FormSurface, FormValues, Settled, SurfaceObserver, SurfaceState};
