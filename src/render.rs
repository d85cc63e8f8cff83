use crate::encode::{SizeBucket, VisualCell};
use crate::page::{Element, GridMount};

/// Attribute holding the serialized tooltip payload on each cell.
pub const TIP_ATTR: &str = "data-tip";

/// One grid cell: a link when the cell carries a URL, a plain container
/// otherwise. Only large cells show their label inline.
pub fn build_cell(cell: &VisualCell) -> Element {
    let mut el = match &cell.link_url {
        Some(url) => {
            let mut a = Element::new("a");
            a.set_attr("href", url);
            a.set_attr("target", "_blank");
            a.set_attr("rel", "noopener");
            a
        }
        None => Element::new("div"),
    };
    el.add_class("cell");
    el.add_class(cell.size.class_name());
    el.set_style("background", &cell.color);
    el.set_attr(TIP_ATTR, &cell.tooltip.to_json());
    if cell.size == SizeBucket::Large && !cell.label.is_empty() {
        el.children.push(Element::new("span").with_class("label").with_text(&cell.label));
    }
    el
}

/// Replace the grid's content with at most `capacity` cells in a single
/// swap. Padding short input is the caller's job. Returns the new grid
/// generation.
pub fn render(grid: &mut GridMount, cells: &[VisualCell], capacity: usize) -> u64 {
    let built: Vec<Element> = cells.iter().take(capacity).map(build_cell).collect();
    grid.replace_children(built)
}
