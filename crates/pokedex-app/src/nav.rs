// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;

pub const FIRST_ID: u32 = 1;

/// Logical keys for the injected key-value persistence collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKey {
    LastVisitedId,
    LastSearch,
}

impl StoreKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LastVisitedId => "nav.last_visited_id",
            Self::LastSearch => "search.last_text",
        }
    }
}

/// Key-value persistence collaborator. Both keys are optional; absence
/// means "identifier 1, empty search".
pub trait PositionStore {
    fn get(&self, key: StoreKey) -> Result<Option<String>>;
    fn set(&mut self, key: StoreKey, value: &str) -> Result<()>;
}

/// Routing collaborator. The engine reads the current path parameter once
/// at startup and navigates to `/<id>` on every settled transition.
pub trait Router {
    fn current_param(&self) -> Option<String>;
    fn navigate(&mut self, id: u32);
}

/// Validates an externally supplied identifier against `[1, size]`.
///
/// Policy for the two conflicting source behaviors: input that does not
/// parse as an integer falls back to `FIRST_ID`; a parsed value above the
/// range clamps to `size`; a parsed value below the range wraps to `size`,
/// matching `step`'s wraparound past the first entry.
pub fn clamp(raw: &str, size: u32) -> u32 {
    if size == 0 {
        return FIRST_ID;
    }
    let Ok(parsed) = raw.trim().parse::<i64>() else {
        return FIRST_ID;
    };
    if parsed > i64::from(size) {
        return size;
    }
    if parsed < 1 {
        return size;
    }
    parsed as u32
}

/// Moves `current` by `delta` with wraparound: below 1 wraps to `size`,
/// above `size` wraps to 1. `delta` is ±1 in practice but any integer is
/// accepted; a single over- or under-run lands on the opposite bound.
pub fn step(current: u32, delta: i64, size: u32) -> u32 {
    if size == 0 {
        return FIRST_ID;
    }
    let next = i64::from(current) + delta;
    if next < 1 {
        size
    } else if next > i64::from(size) {
        FIRST_ID
    } else {
        next as u32
    }
}

/// The stimuli that can move the cursor. All of them settle through
/// `clamp` or `step` before the new id becomes authoritative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavCommand {
    RouteParam(String),
    Prev,
    Next,
    Jump(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    CursorMoved(u32),
    CursorUnchanged(u32),
}

/// The navigation cursor: one authoritative current id bounded by the
/// catalog size. Transitions emit the settled id to the router and the
/// position store so URL, persistence, and cursor stay consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    cursor: u32,
    catalog_size: u32,
}

impl Navigator {
    pub fn new(catalog_size: u32) -> Self {
        Self {
            cursor: FIRST_ID,
            catalog_size,
        }
    }

    /// Builds the startup cursor: an explicit route parameter wins,
    /// otherwise the persisted last-visited id, otherwise `FIRST_ID`.
    /// Either source passes through `clamp` before becoming the cursor.
    pub fn restore<S: PositionStore + ?Sized, R: Router + ?Sized>(
        catalog_size: u32,
        store: &S,
        router: &R,
    ) -> Result<Self> {
        let raw = match router.current_param() {
            Some(param) => Some(param),
            None => store.get(StoreKey::LastVisitedId)?,
        };
        let cursor = match raw {
            Some(raw) => clamp(&raw, catalog_size),
            None => FIRST_ID,
        };
        Ok(Self {
            cursor,
            catalog_size,
        })
    }

    pub const fn cursor(&self) -> u32 {
        self.cursor
    }

    pub const fn catalog_size(&self) -> u32 {
        self.catalog_size
    }

    pub fn dispatch<S: PositionStore + ?Sized, R: Router + ?Sized>(
        &mut self,
        command: NavCommand,
        store: &mut S,
        router: &mut R,
    ) -> Result<Vec<NavEvent>> {
        let next = match command {
            NavCommand::RouteParam(raw) => clamp(&raw, self.catalog_size),
            NavCommand::Prev => step(self.cursor, -1, self.catalog_size),
            NavCommand::Next => step(self.cursor, 1, self.catalog_size),
            NavCommand::Jump(id) => clamp(&id.to_string(), self.catalog_size),
        };

        let moved = next != self.cursor;
        self.cursor = next;
        router.navigate(next);
        store.set(StoreKey::LastVisitedId, &next.to_string())?;

        if moved {
            Ok(vec![NavEvent::CursorMoved(next)])
        } else {
            Ok(vec![NavEvent::CursorUnchanged(next)])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FIRST_ID, NavCommand, NavEvent, Navigator, PositionStore, Router, StoreKey, clamp, step};
    use anyhow::Result;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapStore {
        values: HashMap<&'static str, String>,
    }

    impl PositionStore for MapStore {
        fn get(&self, key: StoreKey) -> Result<Option<String>> {
            Ok(self.values.get(key.as_str()).cloned())
        }

        fn set(&mut self, key: StoreKey, value: &str) -> Result<()> {
            self.values.insert(key.as_str(), value.to_owned());
            Ok(())
        }
    }

    #[derive(Default)]
    struct PathRouter {
        param: Option<String>,
        paths: Vec<String>,
    }

    impl Router for PathRouter {
        fn current_param(&self) -> Option<String> {
            self.param.clone()
        }

        fn navigate(&mut self, id: u32) {
            self.paths.push(format!("/{id}"));
        }
    }

    #[test]
    fn step_wraps_at_both_bounds() {
        assert_eq!(step(3, 1, 3), 1);
        assert_eq!(step(1, -1, 3), 3);
        assert_eq!(step(2, 1, 3), 3);
        assert_eq!(step(2, -1, 3), 1);
    }

    #[test]
    fn step_with_larger_deltas_lands_on_the_opposite_bound() {
        assert_eq!(step(1, -5, 3), 3);
        assert_eq!(step(3, 7, 3), 1);
        assert_eq!(step(1, 0, 3), 1);
    }

    #[test]
    fn clamp_fallbacks_are_in_range() {
        assert_eq!(clamp("abc", 2), 1);
        assert_eq!(clamp("", 2), 1);
        assert_eq!(clamp("  ", 2), 1);
        assert_eq!(clamp("0", 2), 2);
        assert_eq!(clamp("-3", 2), 2);
        assert_eq!(clamp("99", 2), 2);
        assert_eq!(clamp("999999999999999999999999", 2), 1);
        assert_eq!(clamp("2", 2), 2);
        assert_eq!(clamp(" 1 ", 2), 1);
    }

    #[test]
    fn dispatch_route_param_clamps_and_emits_side_effects() -> Result<()> {
        let mut store = MapStore::default();
        let mut router = PathRouter::default();
        let mut nav = Navigator::new(151);

        let events = nav.dispatch(
            NavCommand::RouteParam("9999".to_owned()),
            &mut store,
            &mut router,
        )?;

        assert_eq!(nav.cursor(), 151);
        assert_eq!(events, vec![NavEvent::CursorMoved(151)]);
        assert_eq!(router.paths, vec!["/151".to_owned()]);
        assert_eq!(
            store.get(StoreKey::LastVisitedId)?,
            Some("151".to_owned())
        );
        Ok(())
    }

    #[test]
    fn dispatch_prev_from_first_wraps_to_last() -> Result<()> {
        let mut store = MapStore::default();
        let mut router = PathRouter::default();
        let mut nav = Navigator::new(807);

        nav.dispatch(NavCommand::Prev, &mut store, &mut router)?;
        assert_eq!(nav.cursor(), 807);

        nav.dispatch(NavCommand::Next, &mut store, &mut router)?;
        assert_eq!(nav.cursor(), FIRST_ID);
        assert_eq!(router.paths, vec!["/807".to_owned(), "/1".to_owned()]);
        Ok(())
    }

    #[test]
    fn dispatch_jump_settles_within_bounds() -> Result<()> {
        let mut store = MapStore::default();
        let mut router = PathRouter::default();
        let mut nav = Navigator::new(10);

        let events = nav.dispatch(NavCommand::Jump(25), &mut store, &mut router)?;
        assert_eq!(nav.cursor(), 10);
        assert_eq!(events, vec![NavEvent::CursorMoved(10)]);

        let events = nav.dispatch(NavCommand::Jump(10), &mut store, &mut router)?;
        assert_eq!(events, vec![NavEvent::CursorUnchanged(10)]);
        Ok(())
    }

    #[test]
    fn restore_prefers_route_param_over_persisted_id() -> Result<()> {
        let mut store = MapStore::default();
        store.set(StoreKey::LastVisitedId, "42")?;

        let router = PathRouter {
            param: Some("7".to_owned()),
            paths: Vec::new(),
        };
        let nav = Navigator::restore(151, &store, &router)?;
        assert_eq!(nav.cursor(), 7);

        let no_param = PathRouter::default();
        let nav = Navigator::restore(151, &store, &no_param)?;
        assert_eq!(nav.cursor(), 42);

        let empty_store = MapStore::default();
        let nav = Navigator::restore(151, &empty_store, &no_param)?;
        assert_eq!(nav.cursor(), FIRST_ID);
        Ok(())
    }

    #[test]
    fn restore_clamps_malformed_route_param() -> Result<()> {
        let store = MapStore::default();
        let router = PathRouter {
            param: Some("not-a-number".to_owned()),
            paths: Vec::new(),
        };
        let nav = Navigator::restore(151, &store, &router)?;
        assert_eq!(nav.cursor(), FIRST_ID);
        Ok(())
    }
}
