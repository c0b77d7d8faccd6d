use mandel6_core::{Center, CenterTable, Complex, EvalParams, PointState, Viewport, ESCAPE_RADIUS};
use mandel6_render::{colorize_grid, ColorParams, EvalMode, FrameDriver, RenderBuffer};

/// Tick a fresh driver `ticks` times and return the final grid.
fn run(
    viewport: &Viewport,
    grid: (u32, u32),
    centers: &CenterTable,
    params: &EvalParams,
    mode: EvalMode,
    ticks: u32,
) -> Vec<PointState> {
    let mut driver = FrameDriver::new(grid.0, grid.1).unwrap();
    for _ in 0..ticks {
        driver.tick(viewport, grid, centers, params, mode).unwrap();
    }
    driver.latest().iter().copied().collect()
}

#[test]
fn progressive_matches_full_recompute_single_center() {
    let viewport = Viewport::default_view(64, 48);
    let centers = CenterTable::classic();
    let params = EvalParams::new(80, 2.0, 4, 10).unwrap();

    let full = run(&viewport, (64, 48), &centers, &params, EvalMode::FullRecompute, 1);
    let progressive = run(&viewport, (64, 48), &centers, &params, EvalMode::Progressive, 80);
    assert_eq!(progressive, full);
}

#[test]
fn progressive_matches_full_recompute_with_one_candidate() {
    let viewport = Viewport::new(Complex::new(-1.0, -1.0), 0.15, 48, 48).unwrap();
    let centers = CenterTable::default_six();
    let params = EvalParams::new(60, 10.0, 1, 5).unwrap();

    let full = run(&viewport, (48, 48), &centers, &params, EvalMode::FullRecompute, 1);
    let progressive = run(&viewport, (48, 48), &centers, &params, EvalMode::Progressive, 60);
    assert_eq!(progressive, full);
}

#[test]
fn default_settings_resume_from_claimed_values() {
    let viewport = Viewport::default_view(80, 60);
    let centers = CenterTable::default_six();
    let params = EvalParams::default();
    let mut driver = FrameDriver::new(80, 60).unwrap();

    let mut previous: Vec<PointState> = Vec::new();
    for tick in 0..60 {
        driver
            .tick(&viewport, (80, 60), &centers, &params, EvalMode::Progressive)
            .unwrap();
        let latest: Vec<PointState> = driver.latest().iter().copied().collect();
        for (i, s) in latest.iter().enumerate() {
            if !s.is_escaped() {
                assert!(
                    centers.nearest(s.value(), ESCAPE_RADIUS).is_some(),
                    "tick {tick}, point {i}: stored value {} is unclaimed",
                    s.value()
                );
            }
            if let Some(prev) = previous.get(i) {
                if s.is_escaped() && !prev.is_escaped() {
                    assert!(
                        s.iteration() > prev.iteration(),
                        "tick {tick}, point {i}: escaped without advancing"
                    );
                }
            }
        }
        previous = latest;
    }
}

#[test]
fn viewport_change_restarts_from_fresh() {
    let centers = CenterTable::classic();
    let params = EvalParams::new(100, 2.0, 4, 1).unwrap();
    let mut viewport = Viewport::default_view(32, 32);
    let mut driver = FrameDriver::new(32, 32).unwrap();

    for _ in 0..20 {
        driver.tick(&viewport, (32, 32), &centers, &params, EvalMode::Progressive).unwrap();
    }
    viewport.zoom *= 1.01;
    let stats = driver
        .tick(&viewport, (32, 32), &centers, &params, EvalMode::Progressive)
        .unwrap();
    assert!(stats.reset);
    // One tick after reset: every live point sits at seed + burst.
    assert!(driver
        .latest()
        .iter()
        .all(|s| s.is_escaped() || s.iteration() == 2));
}

#[test]
fn adding_a_center_changes_the_image() {
    let viewport = Viewport::new(Complex::new(4.0, 0.0), 2.0, 40, 30).unwrap();
    let params = EvalParams::default();
    let mut centers = CenterTable::classic();

    let before = run(&viewport, (40, 30), &centers, &params, EvalMode::FullRecompute, 1);
    centers.add(Center::new(Complex::new(4.0, 0.0), 0.5).unwrap()).unwrap();
    let after = run(&viewport, (40, 30), &centers, &params, EvalMode::FullRecompute, 1);

    let alive = |g: &[PointState]| g.iter().filter(|s| !s.is_escaped()).count();
    assert_eq!(alive(&before), 0, "nothing survives this far from the origin");
    assert!(alive(&after) > 0, "the new copy should show up");
}

#[test]
fn end_to_end_colorized_frame() {
    let viewport = Viewport::default_view(120, 80);
    let centers = CenterTable::classic();
    let params = EvalParams::default();
    let mut driver = FrameDriver::new(120, 80).unwrap();
    driver
        .tick(&viewport, (120, 80), &centers, &params, EvalMode::FullRecompute)
        .unwrap();

    let mut buffer = RenderBuffer::new(1, 1);
    colorize_grid(driver.latest(), params.max_iterations, &ColorParams::default(), &mut buffer);
    assert_eq!(buffer.pixels.len(), 120 * 80 * 4);
    let has_non_black = buffer
        .pixels
        .chunks_exact(4)
        .any(|px| px[0] > 0 || px[1] > 0 || px[2] > 0);
    let has_black = buffer
        .pixels
        .chunks_exact(4)
        .any(|px| px[..3] == [0, 0, 0]);
    assert!(has_non_black && has_black);
}

#[test]
fn oversized_grid_is_clamped_not_fatal() {
    let viewport = Viewport::default_view(8, 8);
    let mut driver = FrameDriver::new(8, 8).unwrap();
    let stats = driver
        .tick(
            &viewport,
            (5000, 2),
            &CenterTable::classic(),
            &EvalParams::new(4, 2.0, 1, 1).unwrap(),
            EvalMode::Progressive,
        )
        .unwrap();
    assert_eq!((stats.width, stats.height), (mandel6_render::CAPACITY_CEILING, 2));
}
