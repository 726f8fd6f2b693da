//! Loading of scripts in a page, by inserting script elements into the document.

use crate::config::Config;
use crate::error::{LoadError, LoadErrorKind};
use crate::loader::{LoadFuture, LoadScript};
use crate::locator::Locator;
use futures::channel::oneshot;
use futures::future::FutureExt as _;
use std::cell::RefCell;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ScriptEvent {
    Load,
    Error,
}

/// Handle returned when attaching an event listener, used to detach it again.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(transparent)]
pub struct ListenerId(pub u64);

pub type Listener = Rc<dyn Fn()>;

/// A script element created by a [`Document`].
pub trait ScriptElement {
    fn set_attribute(&self, name: &str, value: &str);

    fn add_event_listener(&self, event: ScriptEvent, listener: Listener) -> ListenerId;

    fn remove_event_listener(&self, event: ScriptEvent, listener: ListenerId);
}

/// The document of the page that scripts are loaded into.
pub trait Document {
    fn create_script_element(&self) -> Rc<dyn ScriptElement>;

    /// Inserts the element into the document head, which starts fetching the script.
    fn append_to_head(&self, element: Rc<dyn ScriptElement>);
}

struct Attached {
    element: Rc<dyn ScriptElement>,
    on_load: ListenerId,
    on_error: ListenerId,
    sender: oneshot::Sender<ScriptEvent>,
}

// Taken by whichever listener fires first; both listeners are then detached, so later events are ignored and the
// element no longer keeps the listeners alive.
type Slot = Rc<RefCell<Option<Attached>>>;

fn listener(slot: &Slot, event: ScriptEvent) -> Listener {
    let slot = slot.clone();
    Rc::new(move || {
        let attached = slot.borrow_mut().take();
        if let Some(attached) = attached {
            attached
                .element
                .remove_event_listener(ScriptEvent::Load, attached.on_load);
            attached
                .element
                .remove_event_listener(ScriptEvent::Error, attached.on_error);
            let _ = attached.sender.send(event);
        }
    })
}

pub struct InPageLoader {
    document: Rc<dyn Document>,
    csp_nonce: Option<String>,
    cross_origin: Option<String>,
}

impl InPageLoader {
    pub fn new(document: Rc<dyn Document>, config: &Config) -> Self {
        Self {
            document,
            csp_nonce: config.csp_nonce.clone(),
            cross_origin: config.cross_origin.clone(),
        }
    }
}

impl LoadScript for InPageLoader {
    fn load(&self, locator: &Locator) -> LoadFuture {
        let element = self.document.create_script_element();
        element.set_attribute("async", "async");
        element.set_attribute("type", "text/javascript");
        if let Some(nonce) = &self.csp_nonce {
            element.set_attribute("nonce", nonce);
        }
        if let Some(cross_origin) = &self.cross_origin {
            element.set_attribute("crossorigin", cross_origin);
        }

        let (sender, receiver) = oneshot::channel();
        let slot = Slot::default();
        let on_load = element.add_event_listener(ScriptEvent::Load, listener(&slot, ScriptEvent::Load));
        let on_error = element.add_event_listener(ScriptEvent::Error, listener(&slot, ScriptEvent::Error));
        *slot.borrow_mut() = Some(Attached {
            element: element.clone(),
            on_load,
            on_error,
            sender,
        });

        element.set_attribute("src", locator);
        self.document.append_to_head(element);

        let locator = locator.clone();
        async move {
            match receiver.await {
                Ok(ScriptEvent::Load) => Ok(()),
                Ok(ScriptEvent::Error) => Err(LoadError::new(LoadErrorKind::ScriptElement { locator })),
                Err(oneshot::Canceled) => Err(LoadError::new(LoadErrorKind::Canceled { locator })),
            }
        }
        .boxed_local()
    }
}

impl Debug for InPageLoader {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        f.debug_struct("InPageLoader")
            .field("csp_nonce", &self.csp_nonce)
            .field("cross_origin", &self.cross_origin)
            .finish_non_exhaustive()
    }
}
