use scriptload::loader::in_page::Listener;
use scriptload::loader::{Document, ListenerId, ScriptElement, ScriptEvent};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Default)]
pub struct SampleElement {
    attributes: RefCell<Vec<(String, String)>>,
    listeners: RefCell<Vec<(ListenerId, ScriptEvent, Listener)>>,
    next_listener: Cell<u64>,
}

impl SampleElement {
    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes
            .borrow()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Dispatches an event to every listener currently attached for it.
    pub fn fire(&self, event: ScriptEvent) {
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, kind, _)| *kind == event)
            .map(|(_, _, listener)| listener.clone())
            .collect();

        for listener in listeners {
            listener();
        }
    }
}

impl ScriptElement for SampleElement {
    fn set_attribute(&self, name: &str, value: &str) {
        let mut attributes = self.attributes.borrow_mut();
        match attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn add_event_listener(&self, event: ScriptEvent, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, event, listener));
        id
    }

    fn remove_event_listener(&self, event: ScriptEvent, listener: ListenerId) {
        self.listeners
            .borrow_mut()
            .retain(|(id, kind, _)| !(*id == listener && *kind == event));
    }
}

/// A document that keeps every script element appended to its head, without fetching anything.
#[derive(Default)]
pub struct SampleDocument {
    created: RefCell<Vec<Rc<SampleElement>>>,
    head: RefCell<Vec<Rc<SampleElement>>>,
}

impl SampleDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scripts(&self) -> Vec<Rc<SampleElement>> {
        self.head.borrow().clone()
    }

    /// Finds the most recently appended script element with the given `src`.
    pub fn script(&self, src: &str) -> Option<Rc<SampleElement>> {
        self.head
            .borrow()
            .iter()
            .rev()
            .find(|element| element.attribute("src").as_deref() == Some(src))
            .cloned()
    }
}

impl Document for SampleDocument {
    fn create_script_element(&self) -> Rc<dyn ScriptElement> {
        let element = Rc::new(SampleElement::default());
        self.created.borrow_mut().push(element.clone());
        element
    }

    fn append_to_head(&self, element: Rc<dyn ScriptElement>) {
        let address = Rc::as_ptr(&element) as *const ();
        let mut created = self.created.borrow_mut();
        if let Some(index) = created
            .iter()
            .position(|candidate| Rc::as_ptr(candidate) as *const () == address)
        {
            self.head.borrow_mut().push(created.swap_remove(index));
        }
    }
}
