use std::time::{Duration, Instant};

use rule90::{
    CellColor, InputController, InputEvent, RecordingSink, RenderEvent, Settings, Simulation,
    SimulationClock,
};

fn settings(width: usize, height: usize) -> Settings {
    Settings { width, height, scale: 10, reset_flash_ms: 0, ..Settings::default() }
}

fn build(width: usize, height: usize) -> (Simulation, RecordingSink) {
    let sink = RecordingSink::new();
    let sim = Simulation::new(&settings(width, height), Box::new(sink.clone())).unwrap();
    sink.clear();
    (sim, sink)
}

#[test]
fn empty_three_by_three_stays_background() {
    let (sim, sink) = build(3, 3);
    sim.tick();

    let snapshot = sim.snapshot();
    assert!(!snapshot.get(1, 1));
    assert_eq!(snapshot.population(), 0);
    assert!(sink.fills().is_empty());
}

#[test]
fn constant_corner_survives_every_tick() {
    let (sim, _) = build(3, 3);
    sim.toggle_constant(0, 0);

    for _ in 0..10 {
        sim.tick();
        let snapshot = sim.snapshot();
        assert!(snapshot.get(0, 0));
        for c in &snapshot.constants {
            assert!(snapshot.get(c.x, c.y));
        }
    }
    assert_eq!(sim.generation(), 10);
}

#[test]
fn constants_hold_while_running_with_neighbours() {
    let (sim, _) = build(6, 6);
    for (x, y) in [(0, 0), (2, 0), (1, 1), (3, 2), (5, 5)] {
        sim.toggle_constant(x, y);
    }
    sim.toggle_pause();

    for _ in 0..8 {
        assert!(sim.scheduled_tick());
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.constants.len(), 5);
        assert!(snapshot.constants.iter().all(|c| snapshot.get(c.x, c.y)));
    }
}

#[test]
fn drag_across_five_cells_toggles_each_once() {
    let (sim, sink) = build(8, 8);
    let mut input = InputController::new(sim.clone(), &settings(8, 8)).unwrap();

    input.handle(InputEvent::PointerDown { x: 5, y: 5 });
    for step in 1..5 {
        input.handle(InputEvent::PointerDrag { x: 5 + step * 10, y: 5 });
        input.handle(InputEvent::PointerDrag { x: 8 + step * 10, y: 6 });
    }
    input.handle(InputEvent::PointerUp);

    let fills = sink.fills();
    assert_eq!(fills.len(), 5);
    assert!(fills.iter().all(|&(_, y, color)| y == 0 && color == CellColor::Highlight));
    let snapshot = sim.snapshot();
    assert_eq!(snapshot.constants.len(), 5);
    assert!((0..5).all(|x| snapshot.get(x, 0)));
}

#[test]
fn drag_back_over_a_cell_toggles_it_off() {
    let (sim, sink) = build(4, 4);
    let mut input = InputController::new(sim.clone(), &settings(4, 4)).unwrap();

    input.handle(InputEvent::PointerDown { x: 1, y: 1 });
    input.handle(InputEvent::PointerDrag { x: 11, y: 1 });
    input.handle(InputEvent::PointerDrag { x: 1, y: 1 });
    input.handle(InputEvent::PointerUp);

    assert_eq!(
        sink.fills(),
        vec![
            (0, 0, CellColor::Highlight),
            (1, 0, CellColor::Highlight),
            (0, 0, CellColor::Background),
        ]
    );
    assert_eq!(sim.snapshot().constants.len(), 1);
}

#[test]
fn reset_while_paused_clears_everything() {
    let (sim, _) = build(4, 4);
    sim.toggle_constant(1, 0);
    sim.toggle_constant(3, 2);
    sim.tick();
    assert!(sim.snapshot().population() > 2);

    sim.reset();
    let snapshot = sim.snapshot();
    assert!(snapshot.constants.is_empty());
    assert_eq!(snapshot.population(), 0);
    assert_eq!(snapshot.cells.len(), 16);
    assert_eq!(sim.generation(), 0);
}

#[test]
fn reset_while_running_is_a_noop() {
    let (sim, sink) = build(4, 4);
    sim.toggle_constant(1, 0);
    sim.toggle_pause();
    sim.scheduled_tick();
    let before = sim.snapshot();
    sink.clear();

    sim.reset();
    assert_eq!(sim.snapshot(), before);
    assert!(sink.events().is_empty());
}

#[test]
fn edits_and_ticks_ignored_during_reset_flash() {
    let sink = RecordingSink::new();
    let settings = Settings { reset_flash_ms: 400, ..settings(4, 3) };
    let sim = Simulation::new(&settings, Box::new(sink.clone())).unwrap();
    sim.toggle_constant(1, 0);

    let resetting = {
        let sim = sim.clone();
        std::thread::spawn(move || sim.reset())
    };
    let deadline = Instant::now() + Duration::from_secs(5);
    while !sim.is_halted() {
        assert!(Instant::now() < deadline, "reset never halted the grid");
        std::thread::sleep(Duration::from_millis(1));
    }

    let before = sim.snapshot();
    let recorded = sink.events().len();
    sim.toggle_pause();
    sim.toggle_constant(2, 2);
    sim.tick();
    assert!(!sim.scheduled_tick());
    sim.reset();

    assert!(sim.is_halted());
    assert!(sim.is_paused());
    assert_eq!(sim.generation(), 0);
    assert_eq!(sim.snapshot(), before);
    assert_eq!(sink.events().len(), recorded);

    resetting.join().unwrap();
    assert!(!sim.is_halted());
    let fills = sink.fills();
    assert!(fills[fills.len() - 12..].iter().all(|&(_, _, c)| c == CellColor::Background));
    assert_eq!(sink.events().last(), Some(&RenderEvent::Present));
}

#[test]
fn pause_toggle_twice_is_idempotent() {
    let (sim, sink) = build(3, 2);
    sim.toggle_constant(2, 1);
    sink.clear();

    sim.toggle_pause();
    sim.toggle_pause();
    assert!(sim.is_paused());

    let events = sink.events();
    let last_fill = events.iter().rev().find_map(|e| match e {
        RenderEvent::Fill { color, .. } => Some(*color),
        _ => None,
    });
    assert_eq!(last_fill, Some(CellColor::Highlight));
    let last_title = events.iter().rev().find_map(|e| match e {
        RenderEvent::Title(t) => Some(t.clone()),
        _ => None,
    });
    assert_eq!(last_title.as_deref(), Some("1s | PAUSED"));
}

#[test]
fn speed_outside_range_is_rejected() {
    let (sim, _) = build(2, 2);
    sim.change_speed(-1.0);
    assert_eq!(sim.interval_secs(), 1.0);
    sim.change_speed(1.01);
    assert_eq!(sim.interval_secs(), 1.0);
    sim.change_speed(1.0);
    assert_eq!(sim.interval_secs(), 2.0);
}

#[tokio::test(start_paused = true)]
async fn clock_ticks_only_while_running() {
    let (sim, _) = build(5, 3);
    sim.toggle_constant(2, 0);
    let clock = SimulationClock::spawn(sim.clone(), &tokio::runtime::Handle::current());

    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert_eq!(sim.generation(), 0);

    sim.toggle_pause();
    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(sim.generation(), 2);
    assert!(sim.snapshot().get(0, 2));

    sim.toggle_pause();
    tokio::time::sleep(Duration::from_millis(3000)).await;
    assert_eq!(sim.generation(), 2);

    clock.stop().await;
}

#[tokio::test(start_paused = true)]
async fn clock_follows_speed_changes() {
    let (sim, _) = build(2, 2);
    sim.change_speed(-0.5);
    let clock = SimulationClock::spawn(sim.clone(), &tokio::runtime::Handle::current());
    sim.toggle_pause();

    tokio::time::sleep(Duration::from_millis(2250)).await;
    assert_eq!(sim.generation(), 4);

    clock.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stopping_clock_ends_task_without_waiting_interval() {
    let (sim, _) = build(2, 2);
    sim.change_speed(1.0);
    let clock = SimulationClock::spawn(sim.clone(), &tokio::runtime::Handle::current());
    tokio::task::yield_now().await;
    assert!(!clock.is_finished());

    let started = tokio::time::Instant::now();
    clock.stop().await;
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test(start_paused = true)]
async fn reset_flash_is_timed_on_the_clock_runtime() {
    let sink = RecordingSink::new();
    let settings = Settings { reset_flash_ms: 100, ..settings(3, 2) };
    let sim = Simulation::new(&settings, Box::new(sink.clone())).unwrap();
    let clock = SimulationClock::spawn(sim.clone(), &tokio::runtime::Handle::current());
    sim.toggle_constant(0, 0);
    sink.clear();

    let started = tokio::time::Instant::now();
    sim.reset();
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert!(sim.is_halted());
    let fills = sink.fills();
    assert_eq!(fills.len(), 6);
    assert!(fills.iter().all(|&(_, _, c)| c == CellColor::Highlight));

    sim.toggle_pause();
    assert!(sim.is_paused());

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(!sim.is_halted());
    let fills = sink.fills();
    assert_eq!(fills.len(), 12);
    assert!(fills[6..].iter().all(|&(_, _, c)| c == CellColor::Background));
    assert!(sim.snapshot().constants.is_empty());

    clock.stop().await;
}
