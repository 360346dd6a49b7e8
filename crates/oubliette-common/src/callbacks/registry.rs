use crate::game::Game;

/// Optional filter arguments attached to a subscription. A subscription
/// with no filter matches every event.
pub trait SubscriptionFilter<P> {
    fn matches(&self, payload: &P) -> bool;
}

/// Filter type for callbacks that take no filter arguments.
#[derive(Debug, Clone, Copy)]
pub struct NoFilter;

impl<P> SubscriptionFilter<P> for NoFilter {
    fn matches(&self, _payload: &P) -> bool {
        true
    }
}

type Callback<P> = Box<dyn FnMut(&mut dyn Game, &P)>;

/// An ordered list of (callback, optional filter) pairs.
///
/// Registration appends; firing walks the list in registration order and
/// invokes every callback whose filter matches. There is no
/// short-circuiting and no priority ordering.
pub struct SubscriptionRegistry<P, F = NoFilter> {
    subscriptions: Vec<(Callback<P>, Option<F>)>,
}

impl<P, F: SubscriptionFilter<P>> SubscriptionRegistry<P, F> {
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    pub fn has_subscriptions(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    pub fn register(
        &mut self,
        filter: Option<F>,
        callback: impl FnMut(&mut dyn Game, &P) + 'static,
    ) {
        self.subscriptions.push((Box::new(callback), filter));
    }

    pub fn fire(&mut self, game: &mut dyn Game, payload: &P) {
        for (callback, filter) in &mut self.subscriptions {
            if let Some(filter) = filter {
                if !filter.matches(payload) {
                    continue;
                }
            }

            callback(game, payload);
        }
    }
}

impl<P, F: SubscriptionFilter<P>> Default for SubscriptionRegistry<P, F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::test_fixtures::TestGame;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct EvenFilter;

    impl SubscriptionFilter<u32> for EvenFilter {
        fn matches(&self, payload: &u32) -> bool {
            payload % 2 == 0
        }
    }

    #[test]
    fn test_fire_in_registration_order() {
        let mut registry: SubscriptionRegistry<u32> = SubscriptionRegistry::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for id in 0..3 {
            let order = Rc::clone(&order);
            registry.register(None, move |_game, _payload| order.borrow_mut().push(id));
        }

        let mut game = TestGame::new();
        registry.fire(&mut game, &7);
        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_filter_skips_without_short_circuiting() {
        let mut registry: SubscriptionRegistry<u32, EvenFilter> = SubscriptionRegistry::new();
        let hits = Rc::new(RefCell::new(Vec::new()));

        let h = Rc::clone(&hits);
        registry.register(Some(EvenFilter), move |_game, payload| {
            h.borrow_mut().push(("filtered", *payload));
        });
        let h = Rc::clone(&hits);
        registry.register(None, move |_game, payload| {
            h.borrow_mut().push(("unfiltered", *payload));
        });

        let mut game = TestGame::new();
        registry.fire(&mut game, &3);
        registry.fire(&mut game, &4);

        assert_eq!(
            *hits.borrow(),
            vec![("unfiltered", 3), ("filtered", 4), ("unfiltered", 4)]
        );
    }

    #[test]
    fn test_has_subscriptions() {
        let mut registry: SubscriptionRegistry<u32> = SubscriptionRegistry::new();
        assert!(!registry.has_subscriptions());
        registry.register(None, |_game, _payload| {});
        assert!(registry.has_subscriptions());
    }
}
