//! # MLFQ Scheduler - Test Suite
//!
//! Scenario tests driving the scheduler through a simulated machine.

#[cfg(test)]
mod tests {
    use crate::{MlfqConfig, MlfqScheduler, RecordingSink, SchedEvent};
    use strata_execution::context::StubSwitch;
    use strata_execution::scheduler::{Band, Priority, SchedContext, Scheduler};
    use strata_execution::thread::{Thread, ThreadFlags, ThreadState, ThreadTable, UserContext};
    use strata_execution::{ExecError, ThreadId, Tick};
    use strata_hal::arch_stubs::StubInterrupts;
    use strata_hal::{InterruptControl, InterruptLevel};
    use alloc::boxed::Box;
    use alloc::sync::Arc;
    use alloc::vec;
    use alloc::vec::Vec;
    use core::sync::atomic::{AtomicUsize, Ordering};

    // =========================================================================
    // Harness
    // =========================================================================

    /// Single-CPU machine: thread table, running thread, clock and stubs
    struct Machine {
        threads: ThreadTable,
        current: ThreadId,
        now: Tick,
        interrupts: StubInterrupts,
        switcher: StubSwitch,
    }

    impl Machine {
        fn boot(main_priority: u8) -> Self {
            let mut threads = ThreadTable::new();
            let main = threads.spawn("main", Priority::new(main_priority));
            let record = threads.get_mut(main).unwrap();
            record.set_state(ThreadState::Running);
            record.set_flag(ThreadFlags::MAIN);
            Self {
                threads,
                current: main,
                now: 0,
                interrupts: StubInterrupts::disabled(),
                switcher: StubSwitch::new(),
            }
        }

        fn spawn(&mut self, name: &str, priority: u8, burst: Tick) -> ThreadId {
            let id = self.threads.allocate_id();
            let thread = Thread::new(id, name, Priority::new(priority)).with_predicted_burst(burst);
            self.threads.insert(thread).unwrap()
        }

        fn ctx(&mut self) -> SchedContext<'_> {
            SchedContext::new(
                &mut self.threads,
                &mut self.current,
                self.now,
                &self.interrupts,
                &mut self.switcher,
            )
        }

        fn thread(&self, id: ThreadId) -> &Thread {
            self.threads.get(id).unwrap()
        }

        fn thread_mut(&mut self, id: ThreadId) -> &mut Thread {
            self.threads.get_mut(id).unwrap()
        }

        /// Advance the clock, charging every tick to the running thread
        fn run_ticks(&mut self, ticks: Tick) {
            let current = self.current;
            for _ in 0..ticks {
                self.now += 1;
                self.thread_mut(current).record_cpu_tick();
            }
        }
    }

    fn scheduler() -> (MlfqScheduler, Arc<RecordingSink>) {
        scheduler_with(MlfqConfig::default())
    }

    fn scheduler_with(config: MlfqConfig) -> (MlfqScheduler, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let sched = MlfqScheduler::new(config).unwrap().with_sink(sink.clone());
        (sched, sink)
    }

    fn queued(sched: &MlfqScheduler) -> Vec<ThreadId> {
        let mut ids: Vec<ThreadId> = sched.queues().snapshot().into_iter().flatten().collect();
        ids.sort();
        ids
    }

    struct CountingContext {
        saves: Arc<AtomicUsize>,
        restores: Arc<AtomicUsize>,
    }

    impl UserContext for CountingContext {
        fn save_state(&mut self) {
            self.saves.fetch_add(1, Ordering::SeqCst);
        }

        fn restore_state(&mut self) {
            self.restores.fetch_add(1, Ordering::SeqCst);
        }
    }

    // =========================================================================
    // Admission
    // =========================================================================

    #[test]
    fn test_admission_follows_band_boundaries() {
        let mut m = Machine::boot(0);
        let (mut sched, _) = scheduler();
        let cases = [
            (0, Band::L3),
            (49, Band::L3),
            (50, Band::L2),
            (99, Band::L2),
            (100, Band::L1),
            (149, Band::L1),
        ];

        let ids: Vec<ThreadId> = cases.iter().map(|&(p, _)| m.spawn("t", p, 10)).collect();
        for &id in &ids {
            sched.ready_to_run(&mut m.ctx(), id).unwrap();
        }

        for (&id, &(_, band)) in ids.iter().zip(cases.iter()) {
            assert_eq!(m.thread(id).queue_level(), Some(band));
            assert_eq!(m.thread(id).state(), ThreadState::Ready);
            assert!(sched.queues().ids(band).contains(&id));
        }
        assert_eq!(sched.stats().ready_threads, [2, 2, 2]);
    }

    #[test]
    fn test_admission_emits_event_and_stamps_wait() {
        let mut m = Machine::boot(0);
        let (mut sched, sink) = scheduler();
        let t = m.spawn("t", 70, 0);
        m.now = 42;

        sched.ready_to_run(&mut m.ctx(), t).unwrap();

        assert_eq!(m.thread(t).last_wait(), 42);
        assert_eq!(
            sink.events(),
            vec![SchedEvent::Admitted { tick: 42, id: t, band: Band::L2 }]
        );
        assert_eq!(sched.metrics().admissions(), 1);
    }

    #[test]
    fn test_double_admission_rejected() {
        let mut m = Machine::boot(0);
        let (mut sched, _) = scheduler();
        let t = m.spawn("t", 10, 0);

        sched.ready_to_run(&mut m.ctx(), t).unwrap();
        assert_eq!(sched.ready_to_run(&mut m.ctx(), t), Err(ExecError::AlreadyExists));
        assert_eq!(sched.queues().len(), 1);
    }

    #[test]
    fn test_admitting_unknown_thread_fails() {
        let mut m = Machine::boot(0);
        let (mut sched, _) = scheduler();
        assert_eq!(
            sched.ready_to_run(&mut m.ctx(), ThreadId::from_raw(999)),
            Err(ExecError::ThreadNotFound)
        );
    }

    #[test]
    #[should_panic(expected = "called with interrupts enabled")]
    fn test_entry_points_require_interrupts_off() {
        let mut m = Machine::boot(0);
        let (mut sched, _) = scheduler();
        m.interrupts.set_level(InterruptLevel::On);
        sched.find_next_to_run(&mut m.ctx());
    }

    // =========================================================================
    // Selection
    // =========================================================================

    #[test]
    fn test_l1_selects_shortest_remaining_burst() {
        let mut m = Machine::boot(0);
        let (mut sched, _) = scheduler();
        let five = m.spawn("five", 120, 5);
        let two = m.spawn("two", 120, 2);
        let eight = m.spawn("eight", 120, 8);
        for id in [five, two, eight] {
            sched.ready_to_run(&mut m.ctx(), id).unwrap();
        }

        assert_eq!(sched.find_next_to_run(&mut m.ctx()), Some(two));
        assert_eq!(sched.find_next_to_run(&mut m.ctx()), Some(five));
        assert_eq!(sched.find_next_to_run(&mut m.ctx()), Some(eight));
    }

    #[test]
    fn test_l2_selects_highest_priority_with_fifo_ties() {
        let mut m = Machine::boot(0);
        let (mut sched, _) = scheduler();
        let first = m.spawn("first", 60, 0);
        let top = m.spawn("top", 90, 0);
        let second = m.spawn("second", 60, 0);
        for id in [first, top, second] {
            sched.ready_to_run(&mut m.ctx(), id).unwrap();
        }

        assert_eq!(sched.find_next_to_run(&mut m.ctx()), Some(top));
        assert_eq!(sched.find_next_to_run(&mut m.ctx()), Some(first));
        assert_eq!(sched.find_next_to_run(&mut m.ctx()), Some(second));
    }

    #[test]
    fn test_l3_is_fifo() {
        let mut m = Machine::boot(0);
        let (mut sched, _) = scheduler();
        let a = m.spawn("a", 10, 0);
        let b = m.spawn("b", 30, 0);
        let c = m.spawn("c", 5, 0);
        for id in [a, b, c] {
            sched.ready_to_run(&mut m.ctx(), id).unwrap();
        }

        assert_eq!(sched.find_next_to_run(&mut m.ctx()), Some(a));
        assert_eq!(sched.find_next_to_run(&mut m.ctx()), Some(b));
        assert_eq!(sched.find_next_to_run(&mut m.ctx()), Some(c));
        assert_eq!(sched.find_next_to_run(&mut m.ctx()), None);
        assert_eq!(sched.metrics().idle_picks(), 1);
    }

    #[test]
    fn test_higher_band_always_wins() {
        let mut m = Machine::boot(0);
        let (mut sched, _) = scheduler();
        let low = m.spawn("low", 10, 0);
        let mid = m.spawn("mid", 99, 0);
        let high = m.spawn("high", 100, 500);
        for id in [low, mid, high] {
            sched.ready_to_run(&mut m.ctx(), id).unwrap();
        }

        assert_eq!(sched.find_next_to_run(&mut m.ctx()), Some(high));
        assert_eq!(sched.find_next_to_run(&mut m.ctx()), Some(mid));
        assert_eq!(sched.find_next_to_run(&mut m.ctx()), Some(low));
    }

    #[test]
    fn test_removal_accrues_wait_and_clears_band() {
        let mut m = Machine::boot(0);
        let (mut sched, sink) = scheduler();
        let t = m.spawn("t", 10, 0);
        sched.ready_to_run(&mut m.ctx(), t).unwrap();
        sink.take();

        m.now = 300;
        assert_eq!(sched.find_next_to_run(&mut m.ctx()), Some(t));

        assert_eq!(m.thread(t).waiting_time(), 300);
        assert_eq!(m.thread(t).queue_level(), None);
        assert_eq!(
            sink.events(),
            vec![SchedEvent::Removed { tick: 300, id: t, band: Band::L3 }]
        );
    }

    // =========================================================================
    // Aging
    // =========================================================================

    #[test]
    fn test_aging_boost_keeps_wait_remainder() {
        let mut m = Machine::boot(0);
        let (mut sched, _) = scheduler();
        let early = m.spawn("early", 20, 0);
        sched.ready_to_run(&mut m.ctx(), early).unwrap();
        m.now = 200;
        let late = m.spawn("late", 20, 0);
        sched.ready_to_run(&mut m.ctx(), late).unwrap();

        m.now = 1700;
        sched.age(&mut m.ctx());

        assert_eq!(m.thread(early).priority().value(), 30);
        assert_eq!(m.thread(early).waiting_time(), 200);
        // Exactly at the threshold is not enough
        assert_eq!(m.thread(late).priority().value(), 20);
        assert_eq!(m.thread(late).waiting_time(), 1500);
    }

    #[test]
    fn test_one_boost_per_sweep() {
        let mut m = Machine::boot(0);
        let (mut sched, _) = scheduler();
        let t = m.spawn("t", 20, 0);
        sched.ready_to_run(&mut m.ctx(), t).unwrap();

        m.now = 3200;
        sched.age(&mut m.ctx());
        assert_eq!(m.thread(t).priority().value(), 30);
        assert_eq!(m.thread(t).waiting_time(), 1700);

        sched.age(&mut m.ctx());
        assert_eq!(m.thread(t).priority().value(), 40);
        assert_eq!(m.thread(t).waiting_time(), 200);
    }

    #[test]
    fn test_aging_moves_thread_to_higher_band() {
        let mut m = Machine::boot(0);
        let (mut sched, sink) = scheduler();
        let t = m.spawn("t", 45, 0);
        sched.ready_to_run(&mut m.ctx(), t).unwrap();

        m.now = 1600;
        assert!(sched.age(&mut m.ctx()));

        assert_eq!(m.thread(t).priority().value(), 55);
        assert_eq!(m.thread(t).queue_level(), Some(Band::L2));
        assert_eq!(sched.queues().ids(Band::L2), vec![t]);
        assert!(sched.queues().ids(Band::L3).is_empty());
        assert_eq!(
            sink.events(),
            vec![
                SchedEvent::Admitted { tick: 0, id: t, band: Band::L3 },
                SchedEvent::PriorityChanged {
                    tick: 1600,
                    id: t,
                    old: Priority::new(45),
                    new: Priority::new(55),
                },
                SchedEvent::Admitted { tick: 1600, id: t, band: Band::L2 },
            ]
        );
        assert_eq!(sched.metrics().band_migrations(), 1);
    }

    #[test]
    fn test_aging_clamps_at_ceiling() {
        let mut m = Machine::boot(149);
        let (mut sched, sink) = scheduler();
        let t = m.spawn("t", 145, 10);
        sched.ready_to_run(&mut m.ctx(), t).unwrap();

        m.now = 1501;
        sched.age(&mut m.ctx());
        assert_eq!(m.thread(t).priority(), Priority::MAX);

        sink.take();
        m.now = 3002;
        sched.age(&mut m.ctx());
        assert_eq!(m.thread(t).priority(), Priority::MAX);
        assert_eq!(m.thread(t).waiting_time(), 2);
        assert!(sink.is_empty());
        assert_eq!(sched.metrics().priority_boosts(), 1);
    }

    #[test]
    fn test_aging_keeps_every_ready_thread_exactly_once() {
        let mut m = Machine::boot(0);
        let (mut sched, _) = scheduler();
        let mut ids = Vec::new();
        for (priority, burst) in [(5, 0), (48, 0), (60, 0), (95, 0), (110, 30), (140, 3)] {
            let id = m.spawn("t", priority, burst);
            sched.ready_to_run(&mut m.ctx(), id).unwrap();
            ids.push(id);
            m.now += 400;
        }
        ids.sort();

        let mut last: Vec<u8> = ids.iter().map(|&id| m.thread(id).priority().value()).collect();
        for _ in 0..6 {
            m.now += 900;
            sched.age(&mut m.ctx());
            assert_eq!(queued(&sched), ids);

            let priorities: Vec<u8> = ids.iter().map(|&id| m.thread(id).priority().value()).collect();
            for (before, after) in last.iter().zip(priorities.iter()) {
                assert!(after >= before);
            }
            for &id in &ids {
                let thread = m.thread(id);
                assert_eq!(thread.queue_level(), Some(thread.priority().band()));
            }
            last = priorities;
        }
    }

    #[test]
    fn test_aging_without_band_change_is_silent() {
        let mut m = Machine::boot(0);
        let (mut sched, sink) = scheduler();
        for name in ["a", "b"] {
            let id = m.spawn(name, 10, 0);
            sched.ready_to_run(&mut m.ctx(), id).unwrap();
        }
        sink.take();

        m.now = 10;
        sched.age(&mut m.ctx());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_aging_keeps_tie_order_within_bands() {
        let mut m = Machine::boot(0);
        let (mut sched, _) = scheduler();
        let a = m.spawn("a", 60, 0);
        let b = m.spawn("b", 60, 0);
        let c = m.spawn("c", 90, 0);
        let x = m.spawn("x", 120, 7);
        let y = m.spawn("y", 130, 7);
        let z = m.spawn("z", 110, 7);
        for id in [a, b, c, x, y, z] {
            sched.ready_to_run(&mut m.ctx(), id).unwrap();
        }

        let before = sched.queues().snapshot();
        assert_eq!(before[0], vec![x, y, z]);
        assert_eq!(before[1], vec![c, a, b]);

        for tick in [5, 6, 7] {
            m.now = tick;
            sched.age(&mut m.ctx());
            assert_eq!(sched.queues().snapshot(), before);
        }

        let order: Vec<ThreadId> = (0..6).filter_map(|_| sched.find_next_to_run(&mut m.ctx())).collect();
        assert_eq!(order, vec![x, y, z, c, a, b]);
    }

    #[test]
    fn test_custom_aging_threshold() {
        let mut m = Machine::boot(0);
        let (mut sched, _) = scheduler_with(MlfqConfig::new().with_aging(100, 5));
        let t = m.spawn("t", 48, 0);
        sched.ready_to_run(&mut m.ctx(), t).unwrap();

        m.now = 101;
        sched.age(&mut m.ctx());
        assert_eq!(m.thread(t).priority().value(), 53);
        assert_eq!(m.thread(t).queue_level(), Some(Band::L2));
    }

    // =========================================================================
    // Preemption
    // =========================================================================

    #[test]
    fn test_higher_band_ready_preempts() {
        let mut m = Machine::boot(60);
        let (mut sched, _) = scheduler();
        let t = m.spawn("t", 120, 50);
        sched.ready_to_run(&mut m.ctx(), t).unwrap();

        assert!(sched.age(&mut m.ctx()));
        assert!(sched.needs_reschedule());
        assert_eq!(sched.metrics().preemption_verdicts(), 1);
    }

    #[test]
    fn test_lower_band_ready_does_not_preempt() {
        let mut m = Machine::boot(120);
        let main = m.current;
        m.thread_mut(main).start_burst(5);
        let (mut sched, _) = scheduler();
        let t = m.spawn("t", 70, 0);
        sched.ready_to_run(&mut m.ctx(), t).unwrap();

        assert!(!sched.age(&mut m.ctx()));
        assert!(!sched.needs_reschedule());
    }

    #[test]
    fn test_shorter_l1_burst_preempts() {
        let mut m = Machine::boot(120);
        let main = m.current;
        m.thread_mut(main).start_burst(10);
        let (mut sched, _) = scheduler();
        let short = m.spawn("short", 110, 4);
        sched.ready_to_run(&mut m.ctx(), short).unwrap();
        assert!(sched.age(&mut m.ctx()));

        let mut m = Machine::boot(120);
        let main = m.current;
        m.thread_mut(main).start_burst(10);
        let (mut sched, _) = scheduler();
        let long = m.spawn("long", 110, 12);
        sched.ready_to_run(&mut m.ctx(), long).unwrap();
        assert!(!sched.age(&mut m.ctx()));
    }

    #[test]
    fn test_preemption_uses_running_threads_remaining_burst() {
        let mut m = Machine::boot(120);
        let main = m.current;
        m.thread_mut(main).start_burst(10);
        m.run_ticks(8);

        let (mut sched, _) = scheduler();
        let a = m.spawn("a", 130, 4);
        let b = m.spawn("b", 110, 6);
        for id in [a, b] {
            sched.ready_to_run(&mut m.ctx(), id).unwrap();
        }

        // Running thread has 2 ticks left; nothing ready is shorter
        assert!(!sched.age(&mut m.ctx()));
    }

    // =========================================================================
    // Dispatch
    // =========================================================================

    #[test]
    fn test_run_switches_and_reports_dispatch() {
        let mut m = Machine::boot(0);
        let main = m.current;
        let (mut sched, sink) = scheduler();
        let worker = m.spawn("worker", 10, 0);
        sched.ready_to_run(&mut m.ctx(), worker).unwrap();
        m.run_ticks(17);

        let next = sched.find_next_to_run(&mut m.ctx()).unwrap();
        sink.take();
        sched.run(&mut m.ctx(), next, false).unwrap();

        assert_eq!(m.current, worker);
        assert_eq!(m.thread(worker).state(), ThreadState::Running);
        assert_eq!(m.thread(worker).ticks_run(), 0);
        assert_eq!(m.switcher.switches(), &[(main, worker)]);
        assert_eq!(
            sink.events(),
            vec![SchedEvent::Dispatched { tick: 17, from: main, to: worker, ticks_run: 17 }]
        );
        assert_eq!(sched.stats().context_switches, 1);
    }

    #[test]
    fn test_run_rejects_bad_targets() {
        let mut m = Machine::boot(0);
        let main = m.current;
        let (mut sched, _) = scheduler();
        let fresh = m.spawn("fresh", 10, 0);

        assert_eq!(sched.run(&mut m.ctx(), fresh, false), Err(ExecError::InvalidState));
        assert_eq!(
            sched.run(&mut m.ctx(), ThreadId::from_raw(999), false),
            Err(ExecError::ThreadNotFound)
        );
        assert_eq!(sched.run(&mut m.ctx(), main, true), Err(ExecError::InvalidArgument));

        let queued = m.spawn("queued", 10, 0);
        sched.ready_to_run(&mut m.ctx(), queued).unwrap();
        assert_eq!(sched.run(&mut m.ctx(), queued, false), Err(ExecError::InvalidState));
        assert_eq!(m.current, main);
        assert_eq!(m.thread(queued).state(), ThreadState::Ready);
        assert_eq!(sched.queues().ids(Band::L3), vec![queued]);

        assert_eq!(sched.pending_destruction(), None);
        assert_eq!(m.switcher.count(), 0);
    }

    #[test]
    #[should_panic(expected = "overflowed its kernel stack")]
    fn test_stack_overflow_detected_on_switch() {
        let mut m = Machine::boot(0);
        let main = m.current;
        let (mut sched, _) = scheduler();
        let worker = m.spawn("worker", 10, 0);
        sched.ready_to_run(&mut m.ctx(), worker).unwrap();
        m.thread_mut(main).kernel_stack_mut().words_mut()[0] = 0;

        let next = sched.find_next_to_run(&mut m.ctx()).unwrap();
        let _ = sched.run(&mut m.ctx(), next, false);
    }

    #[test]
    fn test_user_context_saved_and_restored() {
        let mut m = Machine::boot(10);
        let main = m.current;
        let (mut sched, _) = scheduler();
        let saves = Arc::new(AtomicUsize::new(0));
        let restores = Arc::new(AtomicUsize::new(0));
        let id = m.threads.allocate_id();
        let user = Thread::new(id, "user", Priority::new(10)).with_user_context(Box::new(CountingContext {
            saves: saves.clone(),
            restores: restores.clone(),
        }));
        let user = m.threads.insert(user).unwrap();
        assert!(m.thread(user).is_user_program());

        sched.ready_to_run(&mut m.ctx(), user).unwrap();
        assert_eq!(sched.yield_current(&mut m.ctx()), Ok(Some(user)));
        assert_eq!(saves.load(Ordering::SeqCst), 0);
        assert_eq!(restores.load(Ordering::SeqCst), 1);

        assert_eq!(sched.yield_current(&mut m.ctx()), Ok(Some(main)));
        assert_eq!(saves.load(Ordering::SeqCst), 1);
        assert_eq!(restores.load(Ordering::SeqCst), 1);
    }

    // =========================================================================
    // Yield, sleep and destruction
    // =========================================================================

    #[test]
    fn test_yield_requeues_running_thread() {
        let mut m = Machine::boot(10);
        let main = m.current;
        let (mut sched, _) = scheduler();
        let worker = m.spawn("worker", 10, 0);
        sched.ready_to_run(&mut m.ctx(), worker).unwrap();

        assert_eq!(sched.yield_current(&mut m.ctx()), Ok(Some(worker)));
        assert_eq!(m.current, worker);
        assert_eq!(m.thread(main).state(), ThreadState::Ready);
        assert_eq!(sched.queues().ids(Band::L3), vec![main]);
    }

    #[test]
    fn test_yield_with_nothing_ready_keeps_running() {
        let mut m = Machine::boot(10);
        let main = m.current;
        let (mut sched, _) = scheduler();

        assert_eq!(sched.yield_current(&mut m.ctx()), Ok(None));
        assert_eq!(m.current, main);
        assert_eq!(m.thread(main).state(), ThreadState::Running);
        assert_eq!(m.switcher.count(), 0);
    }

    #[test]
    fn test_finishing_thread_destroyed_after_switch() {
        let mut m = Machine::boot(10);
        let main = m.current;
        let (mut sched, _) = scheduler();
        let worker = m.spawn("worker", 10, 0);
        sched.ready_to_run(&mut m.ctx(), worker).unwrap();

        assert_eq!(sched.sleep_current(&mut m.ctx(), true), Ok(Some(worker)));
        assert_eq!(m.current, worker);
        assert!(!m.threads.contains(main));
        assert_eq!(sched.pending_destruction(), None);
    }

    #[test]
    fn test_successive_finishes_each_reap_their_predecessor() {
        let mut m = Machine::boot(10);
        let main = m.current;
        let (mut sched, _) = scheduler();
        let first = m.spawn("first", 10, 0);
        let second = m.spawn("second", 10, 0);
        for id in [first, second] {
            sched.ready_to_run(&mut m.ctx(), id).unwrap();
        }

        assert_eq!(sched.sleep_current(&mut m.ctx(), true), Ok(Some(first)));
        assert_eq!(sched.sleep_current(&mut m.ctx(), true), Ok(Some(second)));
        assert!(!m.threads.contains(main));
        assert!(!m.threads.contains(first));
        assert_eq!(sched.pending_destruction(), None);
    }

    #[test]
    #[should_panic(expected = "still pending")]
    fn test_finishing_while_destruction_pending_panics() {
        let mut m = Machine::boot(10);
        let (mut sched, _) = scheduler();
        let reaped = m.spawn("reaped", 10, 0);
        let worker = m.spawn("worker", 10, 0);
        sched.ready_to_run(&mut m.ctx(), worker).unwrap();

        // A thread entered at its start routine resumes outside `run`, so
        // the thread that finished before it is still parked.
        sched.mark_for_destruction(reaped);
        let _ = sched.sleep_current(&mut m.ctx(), true);
    }

    #[test]
    fn test_idle_cpu_has_no_running_thread() {
        let mut m = Machine::boot(10);
        let main = m.current;
        let (mut sched, _) = scheduler();
        m.run_ticks(100);

        assert_eq!(sched.sleep_current(&mut m.ctx(), false), Ok(None));
        assert!(!sched.on_tick(&mut m.ctx()));

        let worker = m.spawn("worker", 70, 0);
        assert_eq!(sched.wake(&mut m.ctx(), worker), Ok(false));
        assert_eq!(m.current, main);
        assert_eq!(sched.find_next_to_run(&mut m.ctx()), Some(worker));
    }

    #[test]
    fn test_blocked_thread_woken_later() {
        let mut m = Machine::boot(10);
        let main = m.current;
        let (mut sched, _) = scheduler();
        let worker = m.spawn("worker", 10, 0);
        sched.ready_to_run(&mut m.ctx(), worker).unwrap();

        assert_eq!(sched.sleep_current(&mut m.ctx(), false), Ok(Some(worker)));
        assert_eq!(m.thread(main).state(), ThreadState::Blocked);
        assert!(!sched.queues().contains(main));

        m.now = 50;
        assert_eq!(sched.wake(&mut m.ctx(), main), Ok(false));
        assert_eq!(m.thread(main).state(), ThreadState::Ready);
        assert_eq!(sched.queues().ids(Band::L3), vec![main]);
    }

    #[test]
    fn test_sleep_with_nothing_ready_idles() {
        let mut m = Machine::boot(10);
        let main = m.current;
        let (mut sched, _) = scheduler();

        assert_eq!(sched.sleep_current(&mut m.ctx(), false), Ok(None));
        assert_eq!(m.thread(main).state(), ThreadState::Blocked);
        assert_eq!(sched.metrics().idle_picks(), 1);
    }

    // =========================================================================
    // Timer tick
    // =========================================================================

    #[test]
    fn test_quantum_expiry_requests_yield() {
        let mut m = Machine::boot(10);
        let (mut sched, _) = scheduler();
        let worker = m.spawn("worker", 10, 0);
        sched.ready_to_run(&mut m.ctx(), worker).unwrap();

        m.run_ticks(99);
        assert!(!sched.on_tick(&mut m.ctx()));

        m.run_ticks(1);
        assert!(sched.on_tick(&mut m.ctx()));
        assert_eq!(sched.metrics().quantum_expiries(), 1);
    }

    #[test]
    fn test_stats_and_name() {
        let mut m = Machine::boot(0);
        let (mut sched, _) = scheduler();
        for priority in [120, 60, 70, 10] {
            let id = m.spawn("t", priority, 1);
            sched.ready_to_run(&mut m.ctx(), id).unwrap();
        }

        let stats = sched.stats();
        assert_eq!(sched.name(), "MLFQ");
        assert_eq!(stats.ready_threads, [1, 2, 1]);
        assert_eq!(stats.total_ready(), 4);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            crate::create_scheduler_with_config(MlfqConfig::new().with_quantum(0)),
            Err(ExecError::InvalidArgument)
        ));
        assert_eq!(crate::create_scheduler().config(), &MlfqConfig::default());
    }
}
