#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;

use vizij_scroll_core::{BoundaryEvent, Host, InstanceId, Rect, StyleSink};
use vizij_test_fixtures::{pages, ElementBox};

/// One recorded style write. `target` is `None` for the document root.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleWrite {
    pub target: Option<u32>,
    pub key: String,
    pub value: String,
}

/// In-memory host backed by a fixture page layout.
pub struct MockHost {
    pub scroll_top: f64,
    pub viewport_height: f64,
    names: BTreeMap<String, u32>,
    boxes: Vec<ElementBox>,
    detached: HashSet<u32>,
    scroll_reads: Cell<u32>,
    pub writes: Vec<StyleWrite>,
}

impl MockHost {
    pub fn from_page(name: &str) -> Self {
        let page = pages::layout(name).expect("fixture page");
        let mut names = BTreeMap::new();
        let mut boxes = Vec::new();
        for (elem_name, elem_box) in page.elements {
            names.insert(elem_name, boxes.len() as u32);
            boxes.push(elem_box);
        }
        Self {
            scroll_top: page.scroll_top,
            viewport_height: page.viewport_height,
            names,
            boxes,
            detached: HashSet::new(),
            scroll_reads: Cell::new(0),
            writes: Vec::new(),
        }
    }

    /// Element handle by fixture name.
    pub fn elem(&self, name: &str) -> u32 {
        self.names[name]
    }

    /// Swap in the geometry of another page (a resize). Element handles keep their names.
    pub fn relayout(&mut self, name: &str) {
        let page = pages::layout(name).expect("fixture page");
        self.viewport_height = page.viewport_height;
        for (elem_name, elem_box) in page.elements {
            if let Some(&id) = self.names.get(&elem_name) {
                self.boxes[id as usize] = elem_box;
            }
        }
    }

    pub fn detach(&mut self, elem: u32) {
        self.detached.insert(elem);
    }

    pub fn scroll_reads(&self) -> u32 {
        self.scroll_reads.get()
    }

    pub fn take_writes(&mut self) -> Vec<StyleWrite> {
        std::mem::take(&mut self.writes)
    }
}

impl Host for MockHost {
    type Element = u32;

    fn scroll_top(&self) -> f64 {
        self.scroll_reads.set(self.scroll_reads.get() + 1);
        self.scroll_top
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn bounding_rect(&self, elem: &u32) -> Option<Rect> {
        if self.detached.contains(elem) {
            return None;
        }
        let b = self.boxes.get(*elem as usize)?;
        Some(Rect::new(b.doc_top - self.scroll_top, b.height))
    }

    fn set_property(&mut self, sink: StyleSink<'_, u32>, key: &str, value: &str) {
        let target = match sink {
            StyleSink::Element(e) => Some(*e),
            StyleSink::Root => None,
        };
        self.writes.push(StyleWrite {
            target,
            key: key.to_string(),
            value: value.to_string(),
        });
    }
}

/// Boundary callback record: (instance, precise, normalized, inside?).
#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    pub id: InstanceId,
    pub precise: f64,
    pub normalized: f64,
    pub inside: bool,
}

pub type Hits = Rc<RefCell<Vec<Hit>>>;

pub fn hits() -> Hits {
    Rc::new(RefCell::new(Vec::new()))
}

/// Callback pushing into `log`, tagged inside/outside.
pub fn recorder(log: &Hits, inside: bool) -> impl Fn(&BoundaryEvent<'_>) + 'static {
    let log = log.clone();
    move |ev| {
        log.borrow_mut().push(Hit {
            id: ev.id,
            precise: ev.progress.precise,
            normalized: ev.progress.normalized,
            inside,
        })
    }
}
