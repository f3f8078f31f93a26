//! Teardown behaviour of a mounted view.
//!
//! # Invariants
//!
//! 1. **Quiescence**: after a component unmounts, none of its frame callbacks
//!    or timers run again, no matter how many further steps are driven.
//! 2. **Listener release**: every listener a component attached is detached
//!    when it unmounts, including on host drop.
//! 3. **Single flight**: a component never has more than one frame in flight.
//! 4. **Degraded ornament**: without a render surface nothing is presented
//!    and the rest of the page keeps animating.

use std::time::Duration;

use folio_core::event::{HostEvent, PointerEvent};
use folio_core::geometry::{Bounds, Viewport};
use folio_core::lifecycle::ListenerRegistry;
use folio_web::surface::HeadlessProvider;
use folio_web::{Component, HostConfig, OrnamentStatus, ViewHost};
use proptest::prelude::*;

const FRAME: Duration = Duration::from_millis(16);
const VIEW: Viewport = Viewport::new(1280.0, 720.0, 2.0);

fn mount_all(host: &mut ViewHost, provider: &HeadlessProvider) {
    host.mount_pointer();
    host.mount_ornament(provider.clone(), 7);
    host.mount_live_counter(Bounds::new(0.0, 200.0, 400.0, 300.0), 7);
    host.mount_clock(12 * 3600);
    host.mount_reveal(Bounds::new(0.0, 900.0, 600.0, 400.0));
    host.mount_scroll_indicator();
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Quiescence
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn ornament_resize_then_unmount_goes_quiet() {
    let provider = HeadlessProvider::new();
    let mut host = ViewHost::new(HostConfig::default(), VIEW);
    host.mount_ornament(provider.clone(), 1);
    for _ in 0..10 {
        host.step(FRAME);
    }
    host.push_event(HostEvent::Resize(Viewport::new(800.0, 600.0, 1.0)));
    host.step(FRAME);
    assert_eq!(provider.stats().resizes, 1);

    host.unmount(Component::Ornament);
    let frames = host.frame_invocations(Component::Ornament);
    let presented = provider.stats().presented;
    assert_eq!(frames, 11);

    for _ in 0..100 {
        host.push_event(HostEvent::Resize(Viewport::new(640.0, 480.0, 1.0)));
        host.push_event(PointerEvent::moved(10.0, 10.0));
        host.step(FRAME);
    }
    assert_eq!(host.frame_invocations(Component::Ornament), frames);
    let stats = provider.stats();
    assert_eq!(stats.presented, presented);
    assert_eq!(stats.resizes, 1);
    assert_eq!(stats.released, 1);
}

#[test]
fn navigate_away_stops_timers() {
    let provider = HeadlessProvider::new();
    let mut host = ViewHost::new(HostConfig::default(), VIEW);
    mount_all(&mut host, &provider);
    host.step(Duration::from_secs(3));
    let clock_fires = host.timer_invocations(Component::Clock);
    let live_fires = host.timer_invocations(Component::LiveCounter);
    assert!(clock_fires > 0);
    assert!(live_fires > 0);

    host.navigate_away();
    for _ in 0..10 {
        let result = host.step(Duration::from_secs(2));
        assert_eq!(result.frames_run, 0);
        assert_eq!(result.timers_fired, 0);
    }
    assert_eq!(host.timer_invocations(Component::Clock), clock_fires);
    assert_eq!(host.timer_invocations(Component::LiveCounter), live_fires);
}

#[test]
fn unmounting_one_component_leaves_others_running() {
    let provider = HeadlessProvider::new();
    let mut host = ViewHost::new(HostConfig::default(), VIEW);
    mount_all(&mut host, &provider);
    host.step(FRAME);
    host.unmount(Component::Pointer);
    for _ in 0..5 {
        host.step(FRAME);
    }
    assert_eq!(host.frame_invocations(Component::Pointer), 1);
    assert_eq!(host.frame_invocations(Component::Ornament), 6);
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Listener release
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn every_listener_is_released() {
    let registry = ListenerRegistry::new();
    let provider = HeadlessProvider::new();
    let mut host = ViewHost::with_listeners(HostConfig::default(), VIEW, registry.clone());
    mount_all(&mut host, &provider);
    assert!(registry.total_attached() > 0);

    host.unmount(Component::Ornament);
    assert!(registry.attached(Component::Ornament.owner()).is_empty());

    host.navigate_away();
    assert_eq!(registry.total_attached(), 0);
    let (attached, detached) = registry.call_counts();
    assert_eq!(attached, detached);
}

#[test]
fn dropping_the_host_releases_listeners_and_surface() {
    let registry = ListenerRegistry::new();
    let provider = HeadlessProvider::new();
    {
        let mut host = ViewHost::with_listeners(HostConfig::default(), VIEW, registry.clone());
        mount_all(&mut host, &provider);
        host.step(FRAME);
    }
    assert_eq!(registry.total_attached(), 0);
    assert_eq!(provider.stats().released, 1);
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Single flight
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn never_more_than_one_frame_per_component(
        steps in proptest::collection::vec((0u64..50, 0u8..4), 1..80),
    ) {
        let provider = HeadlessProvider::new();
        let mut host = ViewHost::new(HostConfig::default(), VIEW);
        mount_all(&mut host, &provider);
        let mut step_count = 0u64;
        for (ms, input) in steps {
            match input {
                0 => host.push_event(PointerEvent::moved(ms as f32 * 10.0, 300.0)),
                1 => host.push_event(HostEvent::Scroll { scroll_y: ms as f32 * 20.0, document_height: 3000.0 }),
                2 => host.push_event(HostEvent::Resize(Viewport::new(900.0 + ms as f32, 700.0, 1.0))),
                _ => {}
            }
            let result = host.step(Duration::from_millis(ms));
            step_count += 1;
            prop_assert!(result.frames_run as usize <= Component::ALL.len());
            for c in Component::ALL {
                prop_assert!(host.frame_invocations(c) <= step_count);
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Degraded ornament
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn no_webgl_still_runs_the_page() {
    let provider = HeadlessProvider::unsupported();
    let mut host = ViewHost::new(HostConfig::default(), VIEW);
    mount_all(&mut host, &provider);
    host.push_event(PointerEvent::moved(100.0, 100.0));
    for _ in 0..30 {
        host.step(FRAME);
    }
    assert_eq!(
        host.ornament().map(|o| o.status()),
        Some(OrnamentStatus::Degraded)
    );
    assert_eq!(host.frame_invocations(Component::Ornament), 0);
    assert_eq!(provider.stats().presented, 0);
    assert_eq!(host.frame_invocations(Component::Pointer), 30);
    assert!(host.pointer_indicator().is_some());
}

#[test]
fn lost_context_stops_presenting() {
    let provider = HeadlessProvider::new().losing_context_after(5);
    let mut host = ViewHost::new(HostConfig::default(), VIEW);
    host.mount_ornament(provider.clone(), 3);
    for _ in 0..20 {
        host.step(FRAME);
    }
    let stats = provider.stats();
    assert_eq!(stats.presented, 5);
    assert_eq!(stats.released, 1);
    assert_eq!(
        host.ornament().map(|o| o.status()),
        Some(OrnamentStatus::Degraded)
    );
    assert_eq!(host.frame_invocations(Component::Ornament), 6);
}
