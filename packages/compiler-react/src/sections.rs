//! Per-section JSX renderers, one per [`SectionType`] variant.

use crate::compiler::CompileError;
use crate::context::CompilerContext;
use crate::jsx::{attr, classes, text};
use pagecraft_editor::{resolve, Activation, Element, LinkRef};
use pagecraft_registry::{baseline_data, DataBag, Palette, SectionType};
use serde_json::{Map, Value};

/// Writes one element's markup
pub struct SectionWriter<'c, 'a> {
    ctx: &'c CompilerContext<'a>,
    element: &'c Element,
    palette: &'static Palette,
}

impl<'c, 'a> SectionWriter<'c, 'a> {
    pub fn new(ctx: &'c CompilerContext<'a>, element: &'c Element, palette: &'static Palette) -> Self {
        Self { ctx, element, palette }
    }

    fn data(&self) -> &DataBag {
        self.element.data()
    }

    fn str_or<'d>(&'d self, key: &str, default: &'d str) -> &'d str {
        self.data().get_str(key).unwrap_or(default)
    }

    /// Baseline field, falling back to the registry baseline value
    fn baseline(&self, key: &str) -> String {
        self.data()
            .get_str(key)
            .map(str::to_string)
            .or_else(|| baseline_data().get_str(key).map(str::to_string))
            .unwrap_or_default()
    }

    fn number(&self, key: &str, default: u64) -> u64 {
        match self.data().get(key) {
            Some(Value::Number(n)) => n.as_u64().unwrap_or(default),
            Some(Value::String(s)) => s.parse().unwrap_or(default),
            _ => default,
        }
    }

    fn flag(&self, key: &str) -> bool {
        self.data().get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Array field; missing is empty, anything but an array is malformed
    fn list(&self, key: &str) -> Result<&[Value], CompileError> {
        match self.data().get(key) {
            None | Some(Value::Null) => Ok(&[]),
            Some(Value::Array(items)) => Ok(items),
            Some(_) => Err(self.malformed(key, "array")),
        }
    }

    /// Array of objects
    fn records(&self, key: &str) -> Result<Vec<&Map<String, Value>>, CompileError> {
        self.list(key)?
            .iter()
            .map(|v| v.as_object().ok_or_else(|| self.malformed(key, "array of objects")))
            .collect()
    }

    fn malformed(&self, field: &str, expected: &'static str) -> CompileError {
        CompileError::MalformedField {
            element: self.element.id().to_string(),
            field: field.to_string(),
            expected,
        }
    }

    fn align_class(&self, section: SectionType) -> &'static str {
        if !section.spec().supports_align {
            return "";
        }
        match self.str_or("align", "left") {
            "center" => "text-center",
            "right" => "text-right",
            _ => "text-left",
        }
    }

    fn open_section(&self, tag: &str, extra: &str) {
        let class = classes([
            self.baseline("py").as_str(),
            self.baseline("px").as_str(),
            self.baseline("radius").as_str(),
            self.baseline("shadow").as_str(),
            extra,
        ]);
        let mut open = format!("<{} {}", tag, attr("className", &class));

        let custom_bg = self.str_or("customBg", "");
        let custom_text = self.str_or("customText", "");
        if !custom_bg.is_empty() || !custom_text.is_empty() {
            let mut style = Vec::new();
            if !custom_bg.is_empty() {
                style.push(format!("backgroundColor: {}", crate::jsx::js_str(custom_bg)));
            }
            if !custom_text.is_empty() {
                style.push(format!("color: {}", crate::jsx::js_str(custom_text)));
            }
            open.push_str(&format!(" style={{{{ {} }}}}", style.join(", ")));
        }
        open.push('>');

        self.ctx.add_line(&open);
        self.ctx.indent();
        self.ctx.add_line(&format!(
            "<div {}>",
            attr("className", &classes([self.baseline("maxWidth").as_str(), "mx-auto"]))
        ));
        self.ctx.indent();
    }

    fn close_section(&self, tag: &str) {
        self.ctx.dedent();
        self.ctx.add_line("</div>");
        self.ctx.dedent();
        self.ctx.add_line(&format!("</{}>", tag));
    }

    fn line(&self, tag: &str, class: &str, content: &str) {
        let open = if class.is_empty() {
            tag.to_string()
        } else {
            format!("{} {}", tag, attr("className", class))
        };
        self.ctx.add_line(&format!("<{}>{}</{}>", open, text(content), tag));
    }

    /// Anchor or router link for a stored link value
    fn link(&self, raw: Option<&Value>, label: &str, class: &str) {
        let link = raw.map(LinkRef::from_value).unwrap_or_default();
        let resolved = resolve(&link, self.ctx.routes);
        let class_attr = attr("className", class);

        let line = match (&resolved.activation, self.ctx.options.use_router) {
            (Activation::SwitchPage(_), true) => {
                self.ctx.mark_link_used();
                format!("<Link {} {}>{}</Link>", attr("to", &resolved.href), class_attr, text(label))
            }
            _ => {
                let mut open = format!("<a {} {}", attr("href", &resolved.href), class_attr);
                if let (Some(target), Some(rel)) = (resolved.target(), resolved.rel()) {
                    open.push_str(&format!(" target=\"{}\" rel=\"{}\"", target, rel));
                }
                format!("{}>{}</a>", open, text(label))
            }
        };
        self.ctx.add_line(&line);
    }

    fn button_class(&self) -> String {
        classes(["inline-block px-6 py-3 rounded-lg font-semibold", self.palette.accent])
    }

    pub fn write(&self, section: SectionType) -> Result<(), CompileError> {
        match section {
            SectionType::Navbar => self.navbar(),
            SectionType::Hero => self.hero(),
            SectionType::RichText => self.rich_text(),
            SectionType::Text => self.text_block(),
            SectionType::Image => self.image(),
            SectionType::Cards => self.cards(),
            SectionType::Testimonials => self.testimonials(),
            SectionType::Pricing => self.pricing(),
            SectionType::Contact => self.contact(),
            SectionType::LogoGrid => self.logo_grid(),
            SectionType::Video => self.video(),
            SectionType::Buttons => self.buttons(),
            SectionType::Features => self.features(1),
            SectionType::FeaturesGrid => self.features(2),
            SectionType::Stats => self.stats(),
            SectionType::Cta => self.cta(),
            SectionType::Faq => self.faq(),
            SectionType::Divider => self.divider(),
            SectionType::Footer => self.footer(),
            SectionType::Timeline => self.timeline(),
        }
    }

    /// Generic block for a type this generator does not know
    pub fn placeholder(&self) {
        self.open_section("section", self.palette.secondary);
        self.line(
            "p",
            self.palette.muted,
            &format!("Unsupported section: {}", self.element.kind().tag()),
        );
        self.close_section("section");
    }

    fn navbar(&self) -> Result<(), CompileError> {
        let links = self.records("links")?;
        let sticky = if self.flag("sticky") { "sticky top-0 z-50" } else { "" };

        self.open_section("nav", &classes(["border-b", self.palette.border, sticky]));
        self.ctx.add_line("<div className=\"flex items-center justify-between\">");
        self.ctx.indent();
        self.line("span", "text-xl font-bold", self.str_or("logo", ""));
        self.ctx.add_line("<div className=\"flex gap-6\">");
        self.ctx.indent();
        for item in links {
            let label = item.get("label").and_then(Value::as_str).unwrap_or("");
            self.link(item.get("href"), label, "hover:underline");
        }
        self.ctx.dedent();
        self.ctx.add_line("</div>");
        self.ctx.dedent();
        self.ctx.add_line("</div>");
        self.close_section("nav");
        Ok(())
    }

    fn hero(&self) -> Result<(), CompileError> {
        self.open_section("section", self.align_class(SectionType::Hero));
        self.line("h1", "text-5xl font-bold mb-6", self.str_or("heading", ""));
        self.line("p", &classes(["text-xl mb-8", self.palette.muted]), self.str_or("subheading", ""));
        let button = self.str_or("button", "");
        if !button.is_empty() {
            self.link(self.data().get("buttonHref"), button, &self.button_class());
        }
        self.close_section("section");
        Ok(())
    }

    fn rich_text(&self) -> Result<(), CompileError> {
        self.open_section("section", self.align_class(SectionType::RichText));
        self.line("h2", "text-3xl font-bold mb-4", self.str_or("heading", ""));
        self.line("p", "leading-relaxed whitespace-pre-line", self.str_or("body", ""));
        self.close_section("section");
        Ok(())
    }

    fn text_block(&self) -> Result<(), CompileError> {
        let size = format!("text-{}", self.str_or("fontSize", "base"));
        self.open_section("section", self.align_class(SectionType::Text));
        self.line("p", &size, self.str_or("content", ""));
        self.close_section("section");
        Ok(())
    }

    fn image(&self) -> Result<(), CompileError> {
        let url = self.str_or("url", "");
        let height = self.number("height", 400);
        let width = if self.flag("fullWidth") { "w-full" } else { "w-full max-w-4xl mx-auto" };

        self.open_section("figure", "");
        if url.is_empty() {
            self.ctx.add_line(&format!(
                "<div {} style={{{{ height: {} }}}} />",
                attr("className", &classes([width, self.palette.secondary])),
                height
            ));
        } else {
            self.ctx.add_line(&format!(
                "<img {} {} {} style={{{{ height: {} }}}} />",
                attr("src", url),
                attr("alt", self.str_or("caption", "")),
                attr("className", &classes([width, "object-cover"])),
                height
            ));
        }
        let caption = self.str_or("caption", "");
        if !caption.is_empty() {
            self.line("figcaption", &classes(["mt-2 text-sm text-center", self.palette.muted]), caption);
        }
        self.close_section("figure");
        Ok(())
    }

    fn cards(&self) -> Result<(), CompileError> {
        let titles = self.list("titles")?;
        let descriptions = self.list("descriptions")?;
        let images = self.list("imageUrls")?;
        let label = self.str_or("buttonLabel", "");

        self.open_section("section", "");
        self.ctx.add_line("<div className=\"grid grid-cols-1 md:grid-cols-3 gap-8\">");
        self.ctx.indent();
        for (i, title) in titles.iter().enumerate() {
            let at = |list: &[Value]| list.get(i).and_then(Value::as_str).unwrap_or("").to_string();
            self.ctx.add_line(&format!(
                "<div {}>",
                attr("className", &classes(["rounded-xl overflow-hidden border", self.palette.border, self.palette.secondary]))
            ));
            self.ctx.indent();
            let image = at(images);
            if !image.is_empty() {
                self.ctx.add_line(&format!("<img {} alt=\"\" className=\"w-full h-48 object-cover\" />", attr("src", &image)));
            }
            self.ctx.add_line("<div className=\"p-6\">");
            self.ctx.indent();
            self.line("h3", "text-xl font-semibold mb-2", title.as_str().unwrap_or(""));
            self.line("p", &classes(["mb-4", self.palette.muted]), &at(descriptions));
            if !label.is_empty() {
                self.link(self.data().get("buttonHref"), label, "font-semibold underline");
            }
            self.ctx.dedent();
            self.ctx.add_line("</div>");
            self.ctx.dedent();
            self.ctx.add_line("</div>");
        }
        self.ctx.dedent();
        self.ctx.add_line("</div>");
        self.close_section("section");
        Ok(())
    }

    fn testimonials(&self) -> Result<(), CompileError> {
        let items = self.records("items")?;
        self.open_section("section", "");
        self.ctx.add_line("<div className=\"grid grid-cols-1 md:grid-cols-2 gap-8\">");
        self.ctx.indent();
        for item in items {
            let field = |k: &str| item.get(k).and_then(Value::as_str).unwrap_or("");
            self.ctx.add_line(&format!(
                "<figure {}>",
                attr("className", &classes(["p-6 rounded-xl border", self.palette.border]))
            ));
            self.ctx.indent();
            self.line("blockquote", "text-lg italic mb-4", field("quote"));
            self.ctx.add_line("<figcaption className=\"flex items-center gap-3\">");
            self.ctx.indent();
            if !field("imageUrl").is_empty() {
                self.ctx.add_line(&format!(
                    "<img {} {} className=\"w-10 h-10 rounded-full\" />",
                    attr("src", field("imageUrl")),
                    attr("alt", field("name"))
                ));
            }
            self.line("span", "font-semibold", field("name"));
            self.line("span", self.palette.muted, field("role"));
            self.ctx.dedent();
            self.ctx.add_line("</figcaption>");
            self.ctx.dedent();
            self.ctx.add_line("</figure>");
        }
        self.ctx.dedent();
        self.ctx.add_line("</div>");
        self.close_section("section");
        Ok(())
    }

    fn pricing(&self) -> Result<(), CompileError> {
        let plans = self.records("plans")?;
        self.open_section("section", "");
        self.ctx.add_line("<div className=\"grid grid-cols-1 md:grid-cols-3 gap-8\">");
        self.ctx.indent();
        for plan in plans {
            let field = |k: &str| plan.get(k).and_then(Value::as_str).unwrap_or("");
            let highlighted = plan.get("highlighted").and_then(Value::as_bool).unwrap_or(false);
            let ring = if highlighted { "ring-2 ring-current scale-105" } else { "" };
            self.ctx.add_line(&format!(
                "<div {}>",
                attr("className", &classes(["p-8 rounded-2xl border", self.palette.border, ring]))
            ));
            self.ctx.indent();
            self.line("h3", "text-xl font-semibold", field("name"));
            self.line("p", "text-4xl font-bold my-4", field("price"));
            self.ctx.add_line("<ul className=\"space-y-2 mb-8\">");
            self.ctx.indent();
            let features = match plan.get("features") {
                None | Some(Value::Null) => &[][..],
                Some(Value::Array(f)) => f.as_slice(),
                Some(_) => return Err(self.malformed("plans[].features", "array")),
            };
            for feature in features {
                self.line("li", "", feature.as_str().unwrap_or(""));
            }
            self.ctx.dedent();
            self.ctx.add_line("</ul>");
            self.link(plan.get("buttonHref"), field("buttonLabel"), &self.button_class());
            self.ctx.dedent();
            self.ctx.add_line("</div>");
        }
        self.ctx.dedent();
        self.ctx.add_line("</div>");
        self.close_section("section");
        Ok(())
    }

    fn contact(&self) -> Result<(), CompileError> {
        self.open_section("section", "");
        self.line("h2", "text-3xl font-bold mb-6", self.str_or("heading", ""));
        self.ctx.add_line("<ul className=\"space-y-2\">");
        self.ctx.indent();
        for key in ["email", "phone", "address"] {
            let value = self.str_or(key, "");
            if !value.is_empty() {
                self.line("li", "", value);
            }
        }
        self.ctx.dedent();
        self.ctx.add_line("</ul>");
        self.close_section("section");
        Ok(())
    }

    fn logo_grid(&self) -> Result<(), CompileError> {
        let logos = self.list("logos")?;
        let columns = self.number("columns", 4).clamp(1, 6);
        self.open_section("section", "");
        self.ctx.add_line(&format!("<div className=\"grid grid-cols-2 md:grid-cols-{} gap-8 items-center\">", columns));
        self.ctx.indent();
        for logo in logos {
            let src = logo.as_str().unwrap_or("");
            if !src.is_empty() {
                self.ctx.add_line(&format!("<img {} alt=\"\" className=\"mx-auto h-12 object-contain\" />", attr("src", src)));
            }
        }
        self.ctx.dedent();
        self.ctx.add_line("</div>");
        self.close_section("section");
        Ok(())
    }

    fn video(&self) -> Result<(), CompileError> {
        self.open_section("section", "");
        self.line("h2", "text-3xl font-bold mb-6", self.str_or("heading", ""));
        self.ctx.add_line("<div className=\"aspect-video\">");
        self.ctx.indent();
        self.ctx.add_line(&format!(
            "<iframe {} {} className=\"w-full h-full\" allowFullScreen />",
            attr("src", self.str_or("videoUrl", "")),
            attr("title", self.str_or("heading", "Video"))
        ));
        self.ctx.dedent();
        self.ctx.add_line("</div>");
        self.close_section("section");
        Ok(())
    }

    fn buttons(&self) -> Result<(), CompileError> {
        let buttons = self.records("buttons")?;
        let justify = match self.str_or("align", "center") {
            "left" => "justify-start",
            "right" => "justify-end",
            _ => "justify-center",
        };
        self.open_section("section", "");
        self.ctx.add_line(&format!("<div className=\"flex flex-wrap gap-4 {}\">", justify));
        self.ctx.indent();
        for button in buttons {
            let label = button.get("label").and_then(Value::as_str).unwrap_or("");
            self.link(button.get("href"), label, &self.button_class());
        }
        self.ctx.dedent();
        self.ctx.add_line("</div>");
        self.close_section("section");
        Ok(())
    }

    fn features(&self, default_columns: u64) -> Result<(), CompileError> {
        let items = self.records("items")?;
        let columns = self.number("columns", default_columns).clamp(1, 4);
        self.open_section("section", "");
        self.ctx.add_line(&format!("<div className=\"grid grid-cols-1 md:grid-cols-{} gap-8\">", columns));
        self.ctx.indent();
        for item in items {
            let field = |k: &str| item.get(k).and_then(Value::as_str).unwrap_or("");
            self.ctx.add_line("<div>");
            self.ctx.indent();
            self.line("h3", "text-xl font-semibold mb-2", field("title"));
            self.line("p", self.palette.muted, field("description"));
            self.ctx.dedent();
            self.ctx.add_line("</div>");
        }
        self.ctx.dedent();
        self.ctx.add_line("</div>");
        self.close_section("section");
        Ok(())
    }

    fn stats(&self) -> Result<(), CompileError> {
        let stats = self.records("stats")?;
        self.open_section("section", "");
        self.ctx.add_line("<div className=\"flex flex-wrap justify-around gap-8 text-center\">");
        self.ctx.indent();
        for stat in stats {
            let field = |k: &str| stat.get(k).and_then(Value::as_str).unwrap_or("");
            self.ctx.add_line("<div>");
            self.ctx.indent();
            self.line("p", "text-4xl font-bold", field("value"));
            self.line("p", self.palette.muted, field("label"));
            self.ctx.dedent();
            self.ctx.add_line("</div>");
        }
        self.ctx.dedent();
        self.ctx.add_line("</div>");
        self.close_section("section");
        Ok(())
    }

    fn cta(&self) -> Result<(), CompileError> {
        self.open_section("section", &classes([self.align_class(SectionType::Cta), self.palette.secondary]));
        self.line("h2", "text-4xl font-bold mb-4", self.str_or("heading", ""));
        self.line("p", &classes(["text-lg mb-8", self.palette.muted]), self.str_or("supportingText", ""));
        let button = self.str_or("button", "");
        if !button.is_empty() {
            self.link(self.data().get("buttonHref"), button, &self.button_class());
        }
        self.close_section("section");
        Ok(())
    }

    fn faq(&self) -> Result<(), CompileError> {
        let items = self.records("items")?;
        self.open_section("section", "");
        self.ctx.add_line("<div className=\"space-y-4\">");
        self.ctx.indent();
        for item in items {
            let field = |k: &str| item.get(k).and_then(Value::as_str).unwrap_or("");
            self.ctx.add_line(&format!(
                "<details {}>",
                attr("className", &classes(["p-4 rounded-lg border", self.palette.border]))
            ));
            self.ctx.indent();
            self.line("summary", "font-semibold cursor-pointer", field("question"));
            self.line("p", &classes(["mt-2", self.palette.muted]), field("answer"));
            self.ctx.dedent();
            self.ctx.add_line("</details>");
        }
        self.ctx.dedent();
        self.ctx.add_line("</div>");
        self.close_section("section");
        Ok(())
    }

    fn divider(&self) -> Result<(), CompileError> {
        let height = match self.str_or("height", "md") {
            "sm" => "h-4",
            "lg" => "h-16",
            _ => "h-8",
        };
        self.open_section("div", height);
        if self.flag("showLine") {
            self.ctx.add_line(&format!("<hr {} />", attr("className", self.palette.border)));
        }
        self.close_section("div");
        Ok(())
    }

    fn footer(&self) -> Result<(), CompileError> {
        self.open_section(
            "footer",
            &classes(["border-t", self.palette.border, self.align_class(SectionType::Footer)]),
        );
        self.line("p", &classes(["text-sm", self.palette.muted]), self.str_or("text", ""));
        self.close_section("footer");
        Ok(())
    }

    fn timeline(&self) -> Result<(), CompileError> {
        let items = self.records("items")?;
        self.open_section("section", "");
        self.ctx.add_line(&format!(
            "<ol {}>",
            attr("className", &classes(["border-l-2 pl-6 space-y-8", self.palette.border]))
        ));
        self.ctx.indent();
        for item in items {
            let field = |k: &str| item.get(k).and_then(Value::as_str).unwrap_or("");
            self.ctx.add_line("<li>");
            self.ctx.indent();
            self.line("h3", "text-lg font-semibold", field("title"));
            self.line("p", self.palette.muted, field("description"));
            self.ctx.dedent();
            self.ctx.add_line("</li>");
        }
        self.ctx.dedent();
        self.ctx.add_line("</ol>");
        self.close_section("section");
        Ok(())
    }
}
