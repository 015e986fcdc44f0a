mod context;
pub use context::{build_context, FieldContext, RenderContext};

mod render;
pub use render::{render, render_one, template_ids, RenderedFile};

mod templates;
