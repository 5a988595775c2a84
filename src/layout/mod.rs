//! Layout engine: text measurement, section blocks, page cursor and the
//! pagination driver.

mod block;
mod cursor;
mod geometry;
mod measure;
mod paginate;

pub use block::{layout_section, BlockPlan, BlockStyle, PlanItem, PlanItemKind};
pub use cursor::{CursorState, PageCursor, Reservation};
pub use geometry::Geometry;
pub use measure::{wrap, StandardMetrics, TextMeasurer};
pub use paginate::{paginate, Paginator};
