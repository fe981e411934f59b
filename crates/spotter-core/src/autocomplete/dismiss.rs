use std::sync::{Arc, Mutex, Weak};

/// A rectangle in host coordinates (terminal cells for the TUI).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl Region {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, x: u16, y: u16) -> bool {
        let (x, y) = (u32::from(x), u32::from(y));
        let (left, top) = (u32::from(self.x), u32::from(self.y));
        x >= left
            && y >= top
            && x < left + u32::from(self.width)
            && y < top + u32::from(self.height)
    }
}

/// Where the component was last drawn: the input and, while open, the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub input: Option<Region>,
    pub list: Option<Region>,
}

impl Bounds {
    pub fn contains(&self, x: u16, y: u16) -> bool {
        [self.input, self.list]
            .iter()
            .flatten()
            .any(|region| region.contains(x, y))
    }
}

/// A pointer press anywhere on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerDown {
    pub x: u16,
    pub y: u16,
}

type Listener = Box<dyn Fn(PointerDown) + Send>;

#[derive(Default)]
struct ListenerTable {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Screen-wide pointer listeners, shared by every component on a form.
///
/// The host feeds every pointer press into [`dispatch`](Self::dispatch).
/// Components [`subscribe`](Self::subscribe) when mounted and hold the
/// returned [`Subscription`]; dropping it deregisters the listener.
#[derive(Clone, Default)]
pub struct PointerListeners {
    inner: Arc<Mutex<ListenerTable>>,
}

impl PointerListeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(PointerDown) + Send + 'static,
    {
        let mut table = match self.inner.lock() {
            Ok(table) => table,
            Err(poisoned) => poisoned.into_inner(),
        };
        table.next_id += 1;
        let id = table.next_id;
        table.listeners.push((id, Box::new(listener)));
        Subscription {
            id,
            table: Arc::downgrade(&self.inner),
        }
    }

    pub fn dispatch(&self, event: PointerDown) {
        if let Ok(table) = self.inner.lock() {
            for (_, listener) in &table.listeners {
                listener(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|t| t.listeners.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Registration handle returned by [`PointerListeners::subscribe`].
#[must_use = "dropping the subscription deregisters the listener"]
pub struct Subscription {
    id: u64,
    table: Weak<Mutex<ListenerTable>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(table) = self.table.upgrade() else {
            return;
        };
        let mut table = match table.lock() {
            Ok(table) => table,
            Err(poisoned) => poisoned.into_inner(),
        };
        table.listeners.retain(|(id, _)| *id != self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_region_contains_edges() {
        let region = Region::new(2, 3, 4, 1);
        assert!(region.contains(2, 3));
        assert!(region.contains(5, 3));
        assert!(!region.contains(6, 3));
        assert!(!region.contains(2, 4));
        assert!(!region.contains(1, 3));
    }

    #[test]
    fn test_region_near_u16_max() {
        let region = Region::new(u16::MAX - 1, 0, 10, 1);
        assert!(region.contains(u16::MAX, 0));
    }

    #[test]
    fn test_bounds_union() {
        let bounds = Bounds {
            input: Some(Region::new(0, 0, 10, 1)),
            list: Some(Region::new(0, 1, 10, 4)),
        };
        assert!(bounds.contains(3, 0));
        assert!(bounds.contains(3, 4));
        assert!(!bounds.contains(3, 5));
        assert!(!Bounds::default().contains(0, 0));
    }

    #[test]
    fn test_subscription_released_on_drop() {
        let listeners = PointerListeners::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        let sub = listeners.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(listeners.len(), 1);

        listeners.dispatch(PointerDown { x: 1, y: 1 });
        drop(sub);
        listeners.dispatch(PointerDown { x: 1, y: 1 });

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_subscription_outliving_registry() {
        let listeners = PointerListeners::new();
        let sub = listeners.subscribe(|_| {});
        drop(listeners);
        drop(sub);
    }
}
