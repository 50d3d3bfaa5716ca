/*!
# Application Properties Reader

Root reader of the application-properties stream. Renderer declarations
are grouped by list element; the list a `<renderer>` appears in decides
its kind. Layout components are checked against the application component
renderers of the same stream once it is complete.
*/

use tracing::{debug, warn};

use super::attrs::{text, unexpected};
use super::frame::{ElementEnd, ElementHandler, ElementStart, Parsed, Step};
use super::layout_reader::LayoutFrame;
use super::menu_reader::MenuFrame;
use super::session::ParseSession;
use super::visual_reader::VisualAttributeFrame;
use crate::core::FormResult;
use crate::model::{
    ApplicationParameter, ApplicationProperties, LayoutItem, NamedContainer, RendererDefinition, RendererKind,
};

pub struct ApplicationFrame {
    app: ApplicationProperties,
    /// Renderer list currently open.
    renderer_kind: Option<RendererKind>,
}

impl ApplicationFrame {
    pub fn open(_start: &ElementStart) -> FormResult<Self> {
        Ok(Self {
            app: ApplicationProperties::default(),
            renderer_kind: None,
        })
    }
}

impl ElementHandler for ApplicationFrame {
    fn owner(&self) -> &str {
        "applicationProperties"
    }

    fn on_start(&mut self, _session: &mut ParseSession<'_>, start: &ElementStart) -> FormResult<Step> {
        if let Some(kind) = RendererKind::from_list_element(&start.tag) {
            self.renderer_kind = Some(kind);
            return Ok(Step::Continue);
        }
        match start.tag.as_str() {
            "visualAttribute" => Step::delegate(VisualAttributeFrame::open(start)?),
            "applicationMenu" => Step::delegate(MenuFrame::open(start)?),
            "applicationLayout" => Step::delegate(LayoutFrame::open(start)?),
            "renderer" => {
                let Some(kind) = self.renderer_kind else {
                    return Err(unexpected("renderer", "applicationProperties"));
                };
                self.app.add_renderer(RendererDefinition {
                    name: start.attrs.required("renderer", "name")?,
                    kind,
                    implementation: start.attrs.required("renderer", "implementation")?,
                })?;
                Ok(Step::Continue)
            }
            "parameter" => {
                let parameter = ApplicationParameter {
                    name: start.attrs.required("parameter", "name")?,
                    data_type: start.attrs.string("dataType"),
                    default_value: start.attrs.string("defaultValue"),
                };
                self.app.parameters.insert(parameter, "applicationParameterList")?;
                Ok(Step::Continue)
            }
            _ => Ok(Step::Continue),
        }
    }

    fn on_end(&mut self, _session: &mut ParseSession<'_>, end: &ElementEnd) -> FormResult<()> {
        if RendererKind::from_list_element(&end.tag).is_some() {
            self.renderer_kind = None;
            return Ok(());
        }
        let app = &mut self.app;
        let value = end.text.as_str();
        match end.tag.as_str() {
            "connectionFactory" => app.connection_factory = text(value),
            "translator" => app.translator = text(value),
            "reusableBlockLocation" => app.reusable_block_location = text(value),
            "reusableLovDefinitionLocation" => app.reusable_lov_definition_location = text(value),
            "objectGroupDefinitionLocation" => app.object_group_location = text(value),
            "applicationParameterList" | "parameter" | "visualAttributeList" | "applicationMenuList"
            | "renderer" => {}
            tag => return Err(unexpected(tag, "applicationProperties")),
        }
        Ok(())
    }

    fn integrate(&mut self, _session: &mut ParseSession<'_>, child: Parsed) -> FormResult<()> {
        match child {
            Parsed::VisualAttribute(attribute) => {
                self.app.visual_attributes.insert(attribute, "visualAttributeList")?;
            }
            Parsed::Menu(menu) => {
                self.app.menus.insert(menu, "applicationMenuList")?;
            }
            Parsed::Layout(layout) => {
                if self.app.layout.is_some() {
                    warn!("application layout declared more than once, the last one wins");
                }
                self.app.layout = Some(layout);
            }
            other => return Err(unexpected(other.describe(), "applicationProperties")),
        }
        Ok(())
    }

    fn finish(self, session: &mut ParseSession<'_>) -> FormResult<Parsed> {
        let app = self.app;
        let defaults: Vec<&str> = app.menus.iter().filter(|m| m.is_default).map(|m| m.name.as_str()).collect();
        if defaults.len() > 1 {
            warn!("several default application menus ({}), using {}", defaults.join(", "), defaults[0]);
        }

        if session.loader().config().validation.renderers {
            if let Some(layout) = &app.layout {
                check_components(&app, &layout.items)?;
            }
        }

        debug!(
            "read application properties ({} renderers, {} visual attributes, {} menus)",
            app.renderers.values().map(NamedContainer::len).sum::<usize>(),
            app.visual_attributes.len(),
            app.menus.len()
        );
        Ok(Parsed::Application(Box::new(app)))
    }
}

fn check_components(app: &ApplicationProperties, items: &NamedContainer<LayoutItem>) -> FormResult<()> {
    for item in items.iter() {
        if let Some(renderer) = item.renderer_name.as_deref() {
            app.require_renderer(RendererKind::AppComponent, renderer)?;
        }
        check_components(app, &item.items)?;
    }
    Ok(())
}
