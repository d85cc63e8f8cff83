//! In-memory model of the host page the widget attaches to.
//!
//! Only the pieces the widget touches are modelled: the four mount points,
//! the style context and the grid container's width. Everything renders to
//! HTML for snapshots.

use std::collections::BTreeMap;

use crate::style::StyleContext;

pub const GRID_ID: &str = "vv-grid";
pub const ASOF_ID: &str = "vv-asof";
pub const MSG_ID: &str = "vv-msg";
pub const TIP_ID: &str = "vv-tip";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub style: BTreeMap<String, String>,
    pub attrs: BTreeMap<String, String>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn set_style(&mut self, prop: &str, value: &str) {
        self.style.insert(prop.to_string(), value.to_string());
    }

    pub fn style_value(&self, prop: &str) -> Option<&str> {
        self.style.get(prop).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attrs.insert(name.to_string(), value.to_string());
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        if let Some(id) = &self.id {
            push_attr(out, "id", id);
        }
        if !self.classes.is_empty() {
            push_attr(out, "class", &self.classes.join(" "));
        }
        if !self.style.is_empty() {
            let css: Vec<String> = self.style.iter().map(|(k, v)| format!("{}: {}", k, v)).collect();
            push_attr(out, "style", &css.join("; "));
        }
        for (k, v) in &self.attrs {
            push_attr(out, k, v);
        }
        out.push('>');
        out.push_str(&escape(&self.text));
        for child in &self.children {
            child.write_html(out);
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The grid container. Children are only ever swapped wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridMount {
    cells: Vec<Element>,
    generation: u64,
}

impl GridMount {
    pub fn cells(&self) -> &[Element] {
        &self.cells
    }

    pub fn cell(&self, index: usize) -> Option<&Element> {
        self.cells.get(index)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bumped on every replacement; handlers bound to an older generation
    /// refer to cells that no longer exist.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn replace_children(&mut self, cells: Vec<Element>) -> u64 {
        self.cells = cells;
        self.generation += 1;
        self.generation
    }

    fn to_element(&self) -> Element {
        let mut el = Element::new("div").with_id(GRID_ID).with_class("grid");
        el.children = self.cells.clone();
        el
    }
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub style: StyleContext,
    pub grid_width_px: f64,
    pub grid: Option<GridMount>,
    pub asof: Option<Element>,
    pub msg: Option<Element>,
    pub tooltip: Option<Element>,
}

impl Page {
    /// A page with every mount point present.
    pub fn new(style: StyleContext, grid_width_px: f64) -> Self {
        Self {
            style,
            grid_width_px,
            grid: Some(GridMount::default()),
            asof: Some(Element::new("span").with_id(ASOF_ID)),
            msg: Some(Element::new("span").with_id(MSG_ID)),
            tooltip: Some(Element::new("div").with_id(TIP_ID).with_class("tip")),
        }
    }

    pub fn without_grid(mut self) -> Self {
        self.grid = None;
        self
    }

    pub fn has_mount(&self, id: &str) -> bool {
        match id {
            GRID_ID => self.grid.is_some(),
            ASOF_ID => self.asof.is_some(),
            MSG_ID => self.msg.is_some(),
            TIP_ID => self.tooltip.is_some(),
            _ => false,
        }
    }

    pub fn status_text(&self) -> Option<&str> {
        self.msg.as_ref().map(|m| m.text.as_str())
    }

    pub fn asof_text(&self) -> Option<&str> {
        self.asof.as_ref().map(|m| m.text.as_str())
    }

    pub fn set_status(&mut self, text: &str) {
        if let Some(msg) = self.msg.as_mut() {
            msg.text = text.to_string();
        }
    }

    pub fn set_asof(&mut self, text: &str) {
        if let Some(asof) = self.asof.as_mut() {
            asof.text = text.to_string();
        }
    }

    pub fn to_html(&self) -> String {
        let mut root = Element::new("section").with_class("vv-heatmap");
        if let Some(asof) = &self.asof {
            root.children.push(asof.clone());
        }
        if let Some(msg) = &self.msg {
            root.children.push(msg.clone());
        }
        if let Some(grid) = &self.grid {
            root.children.push(grid.to_element());
        }
        if let Some(tip) = &self.tooltip {
            root.children.push(tip.clone());
        }
        root.to_html()
    }
}
