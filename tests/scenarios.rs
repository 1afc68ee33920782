use bullwhip_breaker::strategy::forecast::ewma;
use bullwhip_breaker::{
    BullwhipController, ChainParams, Mode, OrderPolicy, Role, RoleMap, RoleObservation,
    WeekRecord,
};

fn uniform_week(week: u32, observation: RoleObservation, order: u32) -> WeekRecord {
    WeekRecord::new(week, RoleMap::splat(observation), RoleMap::splat(order))
}

#[test]
fn empty_history_returns_cold_start_for_every_role() {
    let controller = BullwhipController::default();
    let initial = ChainParams::default().for_role(Role::Retailer).initial_order;

    for mode in [Mode::BlackBox, Mode::GlassBox] {
        let orders = controller.decide(&[], mode);
        assert_eq!(orders, RoleMap::splat(initial));
    }
}

#[test]
fn ten_steady_weeks_hold_the_order_at_twenty() {
    let observation = RoleObservation {
        inventory: 50,
        backlog: 0,
        incoming_orders: 20,
        arriving_shipments: 20,
    };
    let history: Vec<_> = (1..=10).map(|w| uniform_week(w, observation, 20)).collect();
    let controller = BullwhipController::default();

    for mode in [Mode::BlackBox, Mode::GlassBox] {
        let orders = controller.decide(&history, mode);
        for (role, &order) in orders.iter() {
            assert!(
                order.abs_diff(20) <= 1,
                "{role} ordered {order} in {mode} steady state"
            );
        }
    }
}

#[test]
fn heavy_backlog_raises_the_order_within_the_step_limit() {
    let observation = RoleObservation {
        inventory: 0,
        backlog: 100,
        incoming_orders: 20,
        arriving_shipments: 0,
    };
    let history = vec![uniform_week(1, observation, 20)];
    let params = ChainParams::default();
    let controller = BullwhipController::new(params.clone()).unwrap();

    let orders = controller.decide(&history, Mode::BlackBox);
    for (role, &order) in orders.iter() {
        let p = params.for_role(role);
        let ceiling = p.max_order.min(20 + p.max_step_up);
        assert!(order > 20, "{role} ordered {order}");
        assert!(order <= ceiling, "{role} ordered {order} above {ceiling}");
    }
}

#[test]
fn surplus_lowers_the_order_within_the_step_limit() {
    let observation = RoleObservation {
        inventory: 400,
        backlog: 0,
        incoming_orders: 20,
        arriving_shipments: 20,
    };
    let history: Vec<_> = (1..=5).map(|w| uniform_week(w, observation, 30)).collect();
    let params = ChainParams::default();
    let controller = BullwhipController::new(params.clone()).unwrap();

    let orders = controller.decide(&history, Mode::BlackBox);
    for (role, &order) in orders.iter() {
        let floor = 30 - params.for_role(role).max_step_down;
        assert!(order < 30, "{role} ordered {order}");
        assert!(order >= floor, "{role} ordered {order} below {floor}");
    }
}

#[test]
fn ewma_converges_on_a_constant_stream_after_a_cold_value() {
    let mut values = vec![0];
    values.extend(std::iter::repeat(20).take(30));
    let forecast = ewma(&values, 0.4).unwrap();
    assert!((forecast - 20.0).abs() < 0.01, "forecast {forecast}");
}

#[test]
fn integral_stays_bounded_under_endless_shortage() {
    let observation = RoleObservation {
        inventory: 0,
        backlog: 500,
        incoming_orders: 20,
        arriving_shipments: 0,
    };
    let history: Vec<_> = (1..=80).map(|w| uniform_week(w, observation, 0)).collect();
    let params = ChainParams::default();
    let controller = BullwhipController::new(params.clone()).unwrap();

    let decisions = controller.explain(&history, Mode::BlackBox);
    for (role, decision) in decisions.iter() {
        let bound = params.for_role(role).integral_clamp;
        assert_eq!(decision.trace.len(), history.len());
        assert!(decision.trace.weeks.iter().all(|w| w.integral.abs() <= bound));
    }
}

#[test]
fn decisions_do_not_mutate_or_depend_on_previous_calls() {
    let observation = RoleObservation {
        inventory: 7,
        backlog: 3,
        incoming_orders: 11,
        arriving_shipments: 5,
    };
    let history: Vec<_> = (1..=6).map(|w| uniform_week(w, observation, 9)).collect();
    let snapshot = history.clone();
    let controller = BullwhipController::default();

    let first = controller.decide(&history, Mode::GlassBox);
    let _other = controller.decide(&history[..2], Mode::BlackBox);
    let second = controller.decide(&history, Mode::GlassBox);

    assert_eq!(first, second);
    assert_eq!(history, snapshot);
}
