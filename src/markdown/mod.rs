mod template;

pub use template::render_markdown;
