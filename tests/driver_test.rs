/*!
 * Tick Driver Tests
 * Wall-clock pacing, pause/resume, speed and reset, on paused tokio time
 */

use aging_scheduler::{
    DriverStatus, FixedIoWait, ProcessType, SchedulerEngine, SimulationConfig, TickDriver,
};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::time::{sleep, Instant};

fn engine() -> SchedulerEngine {
    SchedulerEngine::builder()
        .with_io_wait_source(FixedIoWait(500))
        .build()
}

#[tokio::test(start_paused = true)]
async fn test_ticks_every_base_interval() {
    let driver = TickDriver::spawn(engine());
    driver.admit("P1", ProcessType::Cpu, 5, 1000).unwrap();
    driver.start().unwrap();

    sleep(Duration::from_millis(1600)).await;
    assert_eq!(driver.state().ticks, 3);
    assert_eq!(driver.metrics().current_time, 300);

    driver.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_auto_pause_on_completion() {
    let driver = TickDriver::spawn(engine());
    driver.admit("P1", ProcessType::Cpu, 5, 200).unwrap();
    driver.start().unwrap();

    let state = driver.wait_for(DriverStatus::Completed).await.unwrap();
    assert_eq!(state.ticks, 2);

    // No further ticks once the run has completed
    sleep(Duration::from_secs(5)).await;
    assert_eq!(driver.metrics().current_time, 200);
    assert_eq!(driver.status(), DriverStatus::Completed);

    driver.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_pause_and_resume() {
    let driver = TickDriver::spawn(engine());
    driver.admit("P1", ProcessType::Cpu, 5, 5000).unwrap();
    driver.start().unwrap();

    sleep(Duration::from_millis(1100)).await;
    driver.pause().unwrap();
    driver.wait_for(DriverStatus::Paused).await.unwrap();
    assert_eq!(driver.metrics().current_time, 200);

    sleep(Duration::from_secs(10)).await;
    assert_eq!(driver.metrics().current_time, 200);

    driver.start().unwrap();
    driver.wait_for(DriverStatus::Running).await.unwrap();
    sleep(Duration::from_millis(1100)).await;
    assert_eq!(driver.metrics().current_time, 400);

    driver.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_speed_shortens_period_without_changing_step() {
    let driver = TickDriver::spawn(engine());
    driver.admit("P1", ProcessType::Cpu, 5, 300).unwrap();
    driver.set_speed(2.0).unwrap();
    driver.start().unwrap();

    let started = Instant::now();
    let state = driver.wait_for(DriverStatus::Completed).await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(state.speed, 2.0);
    assert_eq!(state.ticks, 3);
    assert!(elapsed >= Duration::from_millis(750));
    assert!(elapsed < Duration::from_millis(1000));
    // Logical time per tick is unaffected by speed
    assert_eq!(driver.metrics().current_time, 300);

    driver.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_reset_clears_engine_and_speed() {
    let driver = TickDriver::spawn(engine());
    driver.admit("P1", ProcessType::Io, 5, 3000).unwrap();
    driver.set_speed(4.0).unwrap();
    driver.start().unwrap();
    sleep(Duration::from_millis(600)).await;

    driver.reset().unwrap();
    let state = driver.wait_for(DriverStatus::Idle).await.unwrap();
    assert_eq!(state.speed, 1.0);
    assert_eq!(state.ticks, 0);

    let snapshot = driver.snapshot();
    assert_eq!(snapshot.current_time, 0);
    assert!(snapshot.ready.is_empty());
    assert!(snapshot.running.is_none());

    // Resetting again while idle is harmless
    driver.reset().unwrap();
    sleep(Duration::from_secs(2)).await;
    assert_eq!(driver.metrics().current_time, 0);

    driver.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_commands_while_running() {
    let driver = TickDriver::spawn(engine());
    driver.admit("A", ProcessType::Cpu, 5, 2000).unwrap();
    driver.start().unwrap();
    sleep(Duration::from_millis(600)).await;

    driver.admit("B", ProcessType::Io, 2, 500).unwrap();
    driver.set_priorities(["A", "B"], 9).unwrap();
    driver.set_time_quantum(200).unwrap();
    driver.set_aging_factor(10);
    assert!(driver.set_time_quantum(0).is_err());
    assert!(driver.set_priority("ghost", 3).is_err());

    {
        let engine = driver.engine();
        let engine = engine.lock();
        assert_eq!(engine.time_quantum(), 200);
        assert_eq!(engine.aging_factor(), 10);
        assert!(engine.processes().all(|p| p.original_priority() == 9));
    }

    driver.wait_for(DriverStatus::Completed).await.unwrap();
    assert_eq!(driver.metrics().completed_tasks, 2);

    driver.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_driver_from_config() {
    let config = SimulationConfig {
        seed: Some(3),
        speed: 8.0,
        ..SimulationConfig::demo()
    };
    let driver = TickDriver::from_config(&config).unwrap();
    assert_eq!(driver.state().speed, 8.0);

    driver.start().unwrap();
    let state = driver.wait_for(DriverStatus::Completed).await.unwrap();
    let metrics = driver.metrics();
    assert_eq!(metrics.completed_tasks, 4);
    assert_eq!(state.ticks * 100, metrics.current_time);

    driver.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_start_after_completion_stays_completed() {
    let driver = TickDriver::spawn(engine());
    driver.admit("P1", ProcessType::Cpu, 5, 100).unwrap();
    driver.start().unwrap();
    driver.wait_for(DriverStatus::Completed).await.unwrap();

    driver.start().unwrap();
    sleep(Duration::from_secs(2)).await;
    assert_eq!(driver.status(), DriverStatus::Completed);
    assert_eq!(driver.metrics().current_time, 100);

    driver.shutdown().await;
}
