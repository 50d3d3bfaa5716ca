//! Application properties: renderers, visual attributes, menus, layout.

mod common;

use formdef::model::{Color, LayoutItemType, MenuLeafType, RendererKind};
use formdef::{ComponentRegistry, DefinitionKind, DefinitionLoader, InMemorySource, LoaderConfig, MessageKey};
use pretty_assertions::assert_eq;

#[test]
fn test_application_properties_are_read_at_startup() {
    let loader = common::loader(common::source());
    let app = loader.application();

    assert_eq!(app.connection_factory.as_deref(), Some("jdbc.default"));
    assert_eq!(app.translator.as_deref(), Some("i18n.default"));
    let company = app.parameters.get("COMPANY").unwrap();
    assert_eq!(company.default_value.as_deref(), Some("ACME"));

    let grid = app.require_renderer(RendererKind::Block, "Grid").unwrap();
    assert_eq!(grid.implementation, "ui.block.Grid");
    // имена рендереров различаются по виду
    assert!(app.renderer(RendererKind::Item, "Grid").is_none());

    let highlight = app.require_visual_attribute("Highlight").unwrap();
    assert_eq!(highlight.font_weight.as_deref(), Some("bold"));
    assert_eq!(highlight.foreground_color, Some(Color { red: 255, green: 0, blue: 0 }));
}

#[test]
fn test_menus() {
    let loader = common::loader(common::source());
    let app = loader.application();

    let menu = app.default_menu().unwrap();
    assert_eq!(menu.name, "MAIN");
    assert!(menu.is_default);

    let sales = menu.leaves.get("SALES").unwrap();
    assert_eq!(sales.leaf_type, MenuLeafType::Branch);
    assert_eq!(sales.display_name.as_deref(), Some("Sales"));
    let kinds: Vec<MenuLeafType> = sales.leaves.iter().map(|l| l.leaf_type).collect();
    assert_eq!(kinds, vec![MenuLeafType::Form, MenuLeafType::Spacer, MenuLeafType::Action]);
    assert_eq!(sales.leaves.get("EXIT").unwrap().action_command.as_deref(), Some("exit"));

    assert_eq!(menu.form_names(), vec!["ORDERS"]);
}

#[test]
fn test_layout() {
    let loader = common::loader(common::source());
    let app = loader.application();
    let layout = app.layout.as_ref().unwrap();

    assert_eq!(layout.title.as_deref(), Some("Demo"));
    let body = layout.items.get("BODY").unwrap();
    assert_eq!(body.item_type, LayoutItemType::Split);
    assert_eq!(body.orientation.as_deref(), Some("HORIZONTAL"));
    assert_eq!(body.items.len(), 2);

    let nav = layout.find("NAV").unwrap();
    assert_eq!(nav.item_type, LayoutItemType::Component);
    assert_eq!(nav.renderer_name.as_deref(), Some("Navigator"));
}

fn application_with(body: &str) -> InMemorySource {
    let text = format!("<applicationProperties>{}</applicationProperties>", body);
    InMemorySource::new().with(DefinitionKind::Application, "application", text)
}

#[test]
fn test_form_leaf_requires_form_name() {
    let body = r#"
      <applicationMenuList>
        <applicationMenu name="M"><leafList><leaf type="FORM" name="F"/></leafList></applicationMenu>
      </applicationMenuList>"#;
    let err = DefinitionLoader::new(LoaderConfig::default(), application_with(body), ComponentRegistry::new())
        .unwrap_err();
    assert_eq!(err.key(), MessageKey::MissingProperty);
}

#[test]
fn test_only_branches_nest_leaves() {
    let body = r#"
      <applicationMenuList>
        <applicationMenu name="M">
          <leafList>
            <leaf type="ACTION" name="A"><actionCommand>x</actionCommand><leaf type="SPACER"/></leaf>
          </leafList>
        </applicationMenu>
      </applicationMenuList>"#;
    let err = DefinitionLoader::new(LoaderConfig::default(), application_with(body), ComponentRegistry::new())
        .unwrap_err();
    assert_eq!(err.key(), MessageKey::UnexpectedElement);
}

#[test]
fn test_layout_component_needs_declared_renderer() {
    let body = r#"
      <applicationLayout>
        <layoutItemList>
          <layoutItem type="COMPONENT" name="C"><rendererName>Missing</rendererName></layoutItem>
        </layoutItemList>
      </applicationLayout>"#;
    let err = DefinitionLoader::new(LoaderConfig::default(), application_with(body), ComponentRegistry::new())
        .unwrap_err();
    assert_eq!(err.key(), MessageKey::RendererNotDefined);

    let mut config = LoaderConfig::default();
    config.validation.renderers = false;
    let loader = DefinitionLoader::new(config, application_with(body), ComponentRegistry::new()).unwrap();
    assert!(loader.application().layout.is_some());
}

#[test]
fn test_renderer_outside_a_list_is_rejected() {
    let body = r#"<renderer name="X" implementation="y"/>"#;
    let err = DefinitionLoader::new(LoaderConfig::default(), application_with(body), ComponentRegistry::new())
        .unwrap_err();
    assert_eq!(err.key(), MessageKey::UnexpectedElement);
}

#[test]
fn test_unknown_visual_attribute_on_item() {
    let body = r#"
      <blockList>
        <block name="B">
          <itemList><item name="X"><visualAttributeName>Loud</visualAttributeName></item></itemList>
        </block>
      </blockList>"#;
    let source = common::source().with(DefinitionKind::Form, "VA", common::form("VA", body));
    let err = common::loader(source).load_form("VA").unwrap_err();
    assert_eq!(err.key(), MessageKey::VisualAttributeNotFound);
}
