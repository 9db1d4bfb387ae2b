//! demandiq
//!
//! Sales history, demand forecast and reorder planning for one
//! store/department, rendered as two line charts and a reorder table.
//! Pairs with the `demandiq` CLI and the `demandiq-gui` desktop dashboard.
//!
//! ### Features
//! - Fetch weekly sales history and a forecast from the forecast service
//! - A small line-chart engine drawing onto any [`viz::Surface`]
//! - Reorder table and a one-line order recommendation
//! - Export charts as SVG/PNG and the table as CSV/JSON
//!
//! ### Example
//! ```no_run
//! use demandiq::dashboard::{DashboardController, RawInputs};
//! use demandiq::viz::{DisplayList, backend::save_chart};
//! use demandiq::Client;
//!
//! let client = Client::default();
//! let mut dash = DashboardController::new(DisplayList::new(800, 400), DisplayList::new(800, 400));
//! let report = dash.run(&client, &RawInputs::default())?;
//! println!("{}", report.summary);
//! if let Some(surface) = dash.history_slot().surface() {
//!     save_chart(surface, "history.svg")?;
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod dashboard;
pub mod error;
pub mod models;
pub mod reorder;
pub mod stats;
pub mod storage;
pub mod viz;

pub use api::{Client, DataSource};
pub use dashboard::{DashboardController, RawInputs};
pub use error::DashboardError;
pub use reorder::{ReorderSummary, ReorderTable};
