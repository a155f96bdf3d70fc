use modus::{
    run_ticks, Cell, Grid, HexLattice, KnightScene, LatticeConfig,
    Match3Scene, Palette, RenderResources, Scene, SquareLattice,
};

fn config() -> LatticeConfig {
    LatticeConfig {
        canvas_width: 640,
        canvas_height: 480,
        columns: 12,
        render_variant: 1,
    }
}

fn check_cells<G: Grid<Cell = Cell>>(grid: &mut G, palette_len: usize) {
    grid.iterate(|addr, cell| {
        assert!((0.0..=1.0).contains(&cell.alpha), "{}: {:?}", addr, cell);
        assert!((cell.paint.0 as usize) < palette_len, "{}: {:?}", addr, cell);
    });
}

/// The same scene code has to run on either lattice
fn run_knights<G: Grid<Cell = Cell>>(grid: &mut G) {
    let palette = Palette::RAINBOW;
    let mut scene = KnightScene::new(grid, 4, palette.len(), 1234);
    let changed = run_ticks(&mut scene, grid, 500).unwrap();
    assert_eq!(changed, 500);
    for knight in scene.knights() {
        assert!((0..grid.width()).contains(&knight.addr.x));
        assert!((0..grid.height()).contains(&knight.addr.y));
    }
    check_cells(grid, palette.len());
}

#[test]
fn test_knights_on_square() {
    let mut grid =
        SquareLattice::new(&config(), &RenderResources::default(), |_| {
            Cell::default()
        })
        .unwrap();
    run_knights(&mut grid);
}

#[test]
fn test_knights_on_hex() {
    let mut grid =
        HexLattice::new(&config(), &RenderResources::default(), |_| {
            Cell::default()
        })
        .unwrap();
    run_knights(&mut grid);
}

#[test]
fn test_match3() {
    let palette = Palette::RAINBOW;
    let mut grid =
        HexLattice::new(&config(), &RenderResources::default(), |_| {
            Cell::default()
        })
        .unwrap();
    let mut scene = Match3Scene::new(&mut grid, palette.len(), 5);
    run_ticks(&mut scene, &mut grid, 300).unwrap();
    check_cells(&mut grid, palette.len());

    // Whatever is still fading has to be a real line
    for addr in scene.fading() {
        assert_eq!(grid.at(*addr).paint, scene.target());
    }
}

#[test]
fn test_boxed_scene() {
    let mut grid =
        HexLattice::new(&config(), &RenderResources::default(), |_| {
            Cell::default()
        })
        .unwrap();
    let mut scenes: Vec<Box<dyn Scene<HexLattice<Cell>>>> = vec![
        Box::new(KnightScene::new(&mut grid, 1, 6, 0)),
        Box::new(Match3Scene::new(&mut grid, 6, 0)),
    ];
    let names: Vec<_> = scenes.iter().map(|scene| scene.name()).collect();
    assert_eq!(names, vec!["knights", "match3"]);
    for scene in &mut scenes {
        run_ticks(scene.as_mut(), &mut grid, 10).unwrap();
    }
}
