//! Converter events.
//!
//! Listeners are notified synchronously at fixed commit points and may mutate
//! the freshly created reflection in place. Nothing they return is consumed.

use tsz_doc_model::{ProjectReflection, ReflectionId};
use tsz_doc_source::{NodeId, SemanticSource};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConverterEvent {
    /// A declaration or reference reflection was registered.
    CreateDeclaration,
    /// A declaration received its comment and survived exclusion.
    FinalizeDeclaration,
    CreateSignature,
    CreateParameter,
    CreateTypeParameter,
}

impl ConverterEvent {
    pub const fn name(self) -> &'static str {
        match self {
            ConverterEvent::CreateDeclaration => "createDeclaration",
            ConverterEvent::FinalizeDeclaration => "finalizeDeclaration",
            ConverterEvent::CreateSignature => "createSignature",
            ConverterEvent::CreateParameter => "createParameter",
            ConverterEvent::CreateTypeParameter => "createTypeParameter",
        }
    }
}

/// What a listener is told about an event.
#[derive(Copy, Clone)]
pub struct EventData<'a> {
    pub event: ConverterEvent,
    pub reflection: ReflectionId,
    /// The declaration the reflection was created from, when there is one.
    pub node: Option<NodeId>,
    pub source: &'a dyn SemanticSource,
}

pub trait ConverterListener {
    fn on_event(&mut self, data: EventData<'_>, project: &mut ProjectReflection);
}

impl<F> ConverterListener for F
where
    F: FnMut(EventData<'_>, &mut ProjectReflection),
{
    fn on_event(&mut self, data: EventData<'_>, project: &mut ProjectReflection) {
        self(data, project)
    }
}

/// Ordered list of listeners; notified in subscription order.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Box<dyn ConverterListener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<dyn ConverterListener>) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    pub fn emit(&mut self, data: EventData<'_>, project: &mut ProjectReflection) {
        tracing::trace!(
            event = data.event.name(),
            reflection = data.reflection.0,
            "converter event"
        );
        for listener in &mut self.listeners {
            listener.on_event(data, project);
        }
    }
}
