// Setup failure tests
// Each failure must reach the operator display and release everything
// acquired before it exactly once

mod common;

use common::*;
use nes_v5::display::ColorBuffer;
use nes_v5::emulator::AllocationTarget;
use nes_v5::{LoopController, PresenterError};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;
use std::rc::Rc;

#[test]
fn test_missing_image_never_builds_engine() {
    let rig = Rig::new();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let constructed = Cell::new(false);

    let result = LoopController::setup(
        &config_for(PathBuf::from("/nonexistent/usd/game.nes")),
        rig.peripherals(),
        || {
            constructed.set(true);
            Some(MockEngine::new(&calls))
        },
    );

    let err = result.err().expect("setup should fail");
    assert!(matches!(err, PresenterError::Io { .. }));
    assert!(!constructed.get());
    assert!(calls.borrow().is_empty());

    let text = rig.text.borrow();
    assert_eq!(text.line(0), "Failed to open game.nes");
    assert_eq!(
        text.history(),
        ["Starting".to_string(), "Failed to open game.nes".to_string()]
    );
    assert_eq!(rig.screen.borrow().block_copies(), 0);
}

#[test]
fn test_rejected_image_destroys_engine_once() {
    let rom = TempRom::new();
    let rig = Rig::new();
    let calls = Rc::new(RefCell::new(Vec::new()));

    let result = LoopController::setup(&config_for(rom.path.clone()), rig.peripherals(), || {
        Some(MockEngine::new(&calls).rejecting())
    });

    assert!(matches!(result, Err(PresenterError::Load)));
    assert_eq!(
        *calls.borrow(),
        vec![EngineCall::Load(rom.len()), EngineCall::Drop]
    );
    assert_eq!(rig.text.borrow().line(0), "Failed to load ROM data");
}

#[test]
fn test_color_buffer_failure_destroys_engine_once() {
    let rom = TempRom::new();
    let rig = Rig::new();
    let calls = Rc::new(RefCell::new(Vec::new()));

    let result = LoopController::setup_with_allocator(
        &config_for(rom.path.clone()),
        rig.peripherals(),
        || Some(MockEngine::new(&calls)),
        || ColorBuffer::try_new(usize::MAX, 2),
    );

    let err = result.err().expect("setup should fail");
    assert!(matches!(
        err,
        PresenterError::Allocation(AllocationTarget::ColorBuffer)
    ));
    assert_eq!(
        *calls.borrow(),
        vec![EngineCall::Load(rom.len()), EngineCall::Drop]
    );
    assert_eq!(rig.text.borrow().line(0), "Failed to allocate color buffer");
    assert_eq!(rig.screen.borrow().block_copies(), 0);
}

#[test]
fn test_allocator_runs_after_engine_accepts_image() {
    let rom = TempRom::new();
    let rig = Rig::new();
    let calls = Rc::new(RefCell::new(Vec::new()));
    let allocated = Cell::new(false);

    let result = LoopController::setup_with_allocator(
        &config_for(rom.path.clone()),
        rig.peripherals(),
        || Some(MockEngine::new(&calls).rejecting()),
        || {
            allocated.set(true);
            ColorBuffer::try_for_screen()
        },
    );

    assert!(matches!(result, Err(PresenterError::Load)));
    assert!(!allocated.get());
}

#[test]
fn test_engine_construction_failure() {
    let rom = TempRom::new();
    let rig = Rig::new();

    let result = LoopController::<MockEngine>::setup(
        &config_for(rom.path.clone()),
        rig.peripherals(),
        || None,
    );

    assert!(matches!(result, Err(PresenterError::EngineInit)));
    assert_eq!(rig.text.borrow().line(0), "Failed to create emulator");
}

#[test]
fn test_successful_setup_shows_banner_only() {
    let rom = TempRom::new();
    let rig = Rig::new();
    let calls = Rc::new(RefCell::new(Vec::new()));

    let controller = LoopController::setup(&config_for(rom.path.clone()), rig.peripherals(), || {
        Some(MockEngine::new(&calls))
    })
    .unwrap();

    assert_eq!(rig.text.borrow().history(), ["Starting".to_string()]);
    assert_eq!(*calls.borrow(), vec![EngineCall::Load(rom.len())]);
    assert!(controller.logger().contains("mapper 0, 1x16KB PRG"));

    drop(controller);
    assert_eq!(count_calls(&calls, &EngineCall::Drop), 1);
}

#[test]
fn test_headerless_image_is_left_to_engine() {
    let rom = TempRom::with_bytes(&[0xEA; 64]);
    let rig = Rig::new();
    let calls = Rc::new(RefCell::new(Vec::new()));

    let controller = LoopController::setup(&config_for(rom.path.clone()), rig.peripherals(), || {
        Some(MockEngine::new(&calls))
    })
    .unwrap();

    assert_eq!(calls.borrow()[0], EngineCall::Load(64));
    assert!(controller.logger().contains("without an iNES header"));
}

#[test]
fn test_failure_is_written_to_log_file() {
    let rig = Rig::new();
    let log_path = std::env::temp_dir().join(format!("nes_v5_setup_{}.log", std::process::id()));

    let mut config = config_for(PathBuf::from("/nonexistent/game.nes"));
    config.logging.file = Some(log_path.clone());

    let result = LoopController::<MockEngine>::setup(&config, rig.peripherals(), || None);
    assert!(result.is_err());

    let contents = std::fs::read_to_string(&log_path).unwrap();
    std::fs::remove_file(&log_path).ok();

    assert!(contents.contains("Starting"));
    assert!(contents.contains("ERROR"));
    assert!(contents.contains("Failed to open game.nes"));
}

#[test]
fn test_allocation_messages() {
    assert_eq!(
        PresenterError::Allocation(AllocationTarget::GameData).operator_message(),
        "Failed to allocate memory for game data"
    );
    assert_eq!(
        PresenterError::Allocation(AllocationTarget::ColorBuffer).operator_message(),
        "Failed to allocate color buffer"
    );
}
