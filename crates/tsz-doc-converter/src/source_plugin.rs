//! Records where declarations and signatures come from.

use tsz_doc_model::{ProjectReflection, SourceReference};

use crate::events::{ConverterEvent, ConverterListener, EventData};

/// Appends a [`SourceReference`] for the originating node of every created
/// declaration and signature.
#[derive(Debug, Default)]
pub struct SourcePlugin;

impl ConverterListener for SourcePlugin {
    fn on_event(&mut self, data: EventData<'_>, project: &mut ProjectReflection) {
        if !matches!(
            data.event,
            ConverterEvent::CreateDeclaration | ConverterEvent::CreateSignature
        ) {
            return;
        }
        let Some(node) = data.node else {
            return;
        };
        let Some(position) = data.source.position_of(node) else {
            return;
        };
        if let Some(reflection) = project.get_mut(data.reflection) {
            let reference = SourceReference::from(&position);
            if !reflection.sources.contains(&reference) {
                reflection.sources.push(reference);
            }
        }
    }
}
