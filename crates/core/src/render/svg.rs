use crate::{
    config::LatticeConfig,
    lattice::{
        cell::Cell,
        unit::{CellAddr, Point2},
        Grid,
    },
    render::{Palette, RenderResources, RingBand},
};
use svg::{
    node::{
        element::{Group, Polygon},
        Comment,
    },
    Document,
};

/// Render the current state of a lattice as an SVG, the same size as the
/// canvas the lattice was fitted to. Each cell is drawn as its ring preset:
/// nested copies of the cell's outline, outermost first, shaded from the
/// cell's paint.
pub fn lattice_to_svg<G>(
    grid: &G,
    config: &LatticeConfig,
    resources: &RenderResources,
    palette: &Palette,
) -> Document
where
    G: Grid<Cell = Cell>,
{
    let mut document = Document::new()
        .set(
            "viewBox",
            (0, 0, config.canvas_width, config.canvas_height),
        )
        .set("shape-rendering", "crispEdges")
        .add(Comment::new(format!("\n{:#?}\n", config)));

    // These are the same for every cell
    let outline = grid.cell_outline();
    let bands = resources.ring_preset(grid.render_variant());

    for x in 0..grid.width() {
        for y in 0..grid.height() {
            let addr = CellAddr::new(x, y);
            document = document.add(draw_cell(
                addr,
                grid.center_for(addr),
                grid.at(addr),
                &outline,
                bands,
                palette,
            ));
        }
    }

    document
}

/// Generate an SVG group for a single cell
fn draw_cell(
    addr: CellAddr,
    center: Point2,
    cell: &Cell,
    outline: &[Point2],
    bands: &[RingBand],
    palette: &Palette,
) -> Group {
    let color = palette.color(cell.paint);
    let mut group = Group::new()
        .set(
            "transform",
            format!(
                "translate({} {}) rotate({})",
                center.x,
                center.y,
                cell.theta.to_degrees()
            ),
        )
        .set("fill-opacity", cell.alpha)
        .add(Comment::new(addr.to_string())); // Readability!

    for band in bands {
        let scale = band.radius * cell.scale;
        group = group.add(
            Polygon::new()
                .set(
                    "points",
                    outline
                        .iter()
                        .map(|vertex| (vertex.x * scale, vertex.y * scale))
                        .collect::<Vec<_>>(),
                )
                .set("fill", (color * (band.value as f32 / 255.0)).to_html()),
        );
    }

    group
}
