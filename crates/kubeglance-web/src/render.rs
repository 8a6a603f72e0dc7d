use handlebars::Handlebars;

use crate::view::PageView;

const INDEX: &str = "index";
const INDEX_TEMPLATE: &str = include_str!("../templates/index.html.hbs");

/// Renders the dashboard page
pub struct Renderer {
    registry: Handlebars<'static>,
}

impl Renderer {
    /// Renderer with the built-in page template
    pub fn new() -> Result<Self, handlebars::TemplateError> {
        Self::with_template(INDEX_TEMPLATE)
    }

    /// Renderer with a custom page template
    pub fn with_template(source: &str) -> Result<Self, handlebars::TemplateError> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_template_string(INDEX, source)?;
        Ok(Self { registry })
    }

    /// Render the whole page or nothing
    pub fn render(&self, page: &PageView) -> Result<String, handlebars::RenderError> {
        self.registry.render(INDEX, page)
    }
}
