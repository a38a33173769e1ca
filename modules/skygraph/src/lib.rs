pub mod export;
pub mod graph;
pub mod report;

pub use export::{default_output_path, export, ExportFormat};
pub use graph::{build_graph, fans, mutuals, not_followed_back, SocialGraph};
pub use report::render_summary;
