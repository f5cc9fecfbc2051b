use life_game::camera::Camera;
use life_game::config::Config;
use life_game::config::GameConfig;
use life_game::control::Control;

const SETTINGS: &str = "
    # the seed of the mapping tests, on a terminal
    ROW_NUMS = 5
    COLUMN_NUMS = 5
    INIT_CELLS = 0,1 1,0 1,2 1,4 3,1 4,4
";

fn control() -> Control<Camera> {
    let config: Config = SETTINGS.parse().unwrap();
    let game = GameConfig::from_config(&config, GameConfig::terminal()).unwrap();

    Control::new(game, Camera::new(6, 8))
}

#[test]
fn paints_the_seed() {
    let mut control = control();

    assert_eq!(control.canvas().shape_count(), 6);
    assert_eq!(
        control.canvas_mut().render(),
        "\u{282A}\u{2810}\u{2800}\n\u{2808}\u{2800}\u{2801}\n"
    );
}

#[test]
fn rows_are_indexed_by_y() {
    let control = control();
    let rows: Vec<_> = control.mapping().game_map().collect();

    for (x, y) in [(0, 1), (1, 0), (1, 2), (1, 4), (3, 1), (4, 4)] {
        assert!(rows[y][x].shape().is_some(), "({x}, {y})");
    }
    // (2, 1) is dead, (1, 2) is alive
    assert_eq!(rows[1][2].shape(), None);
    assert!(rows[2][1].shape().is_some());
}

#[test]
fn repaints_after_a_generation() {
    let mut control = control();

    let survivor = control.mapping().cell(0, 1).unwrap().shape();
    control.tick();

    for (x, y) in [(1, 0), (1, 2), (1, 4), (3, 1), (4, 4)] {
        assert_eq!(control.mapping().cell(x, y).unwrap().shape(), None, "({x}, {y})");
    }
    for (x, y) in [(1, 1), (2, 1)] {
        assert!(control.mapping().cell(x, y).unwrap().shape().is_some(), "({x}, {y})");
    }
    assert_eq!(control.mapping().cell(0, 1).unwrap().shape(), survivor);

    assert_eq!(control.canvas().shape_count(), 3);
    assert_eq!(
        control.canvas_mut().render(),
        "\u{2812}\u{2802}\u{2800}\n\u{2800}\u{2800}\u{2800}\n"
    );
    insta::assert_snapshot!(control.mapping().to_string(), @r"
    .....
    OOO..
    .....
    .....
    .....
    ");
}

#[test]
fn reset_brings_back_the_seed() {
    let mut control = control();
    control.tick();
    control.tick();

    control.reset();

    assert_eq!(control.mapping().generation(), 0);
    assert_eq!(control.canvas().shape_count(), 6);
    assert_eq!(
        control.canvas_mut().render(),
        "\u{282A}\u{2810}\u{2800}\n\u{2808}\u{2800}\u{2801}\n"
    );
}
