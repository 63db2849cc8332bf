pub mod named_conf_parser;
pub mod named_conf_renderer;
pub mod snapshot;
pub mod zone_renderer;

pub use named_conf_parser::{parse_zone_statements, ZoneStatement};
pub use named_conf_renderer::NamedConfRenderer;
pub use snapshot::{ModelSnapshot, PlannedView, ServerSetPlan};
pub use zone_renderer::ZoneRenderer;
