//! Structural rules enforced while definitions are read.

mod common;

use formdef::model::{CanvasType, PropertyKind, ScreenType};
use formdef::{DefinitionKind, FormError, MessageKey};
use pretty_assertions::assert_eq;

fn load(name: &str, body: &str) -> Result<std::sync::Arc<formdef::model::FormProperties>, FormError> {
    let source = common::source().with(DefinitionKind::Form, name, common::form(name, body));
    common::loader(source).load_form(name)
}

#[test]
fn test_group_and_split_children_are_routed() {
    let body = r#"
      <canvasList>
        <canvas name="MAIN">
          <canvasList>
            <canvas name="BOX" type="GROUP"><groupFrameTitle>Box</groupFrameTitle></canvas>
            <canvas name="HALVES" type="SPLIT"><splitOrientation>VERTICAL</splitOrientation></canvas>
            <canvas name="PLAIN"/>
            <canvas name="ASK" type="POPUP"/>
          </canvasList>
        </canvas>
      </canvasList>"#;
    let form = load("ROUTED", body).unwrap();

    let main = form.require_canvas("MAIN").unwrap();
    let names = |ids: &[formdef::model::CanvasId]| -> Vec<String> {
        ids.iter().map(|id| form.canvases.get(*id).unwrap().name.clone()).collect()
    };
    assert_eq!(names(&main.group_canvases), vec!["BOX"]);
    assert_eq!(names(&main.split_canvases), vec!["HALVES"]);
    assert_eq!(names(&main.content_canvases), vec!["PLAIN"]);

    // всплывающая канва не остаётся внутри родителя
    let popups: Vec<&str> = form.canvases.popups().map(|c| c.name.as_str()).collect();
    assert_eq!(popups, vec!["ASK"]);
    assert_eq!(form.require_canvas("BOX").unwrap().canvas_type, CanvasType::Group);
    assert_eq!(form.require_canvas("HALVES").unwrap().content_canvas_name.as_deref(), Some("MAIN"));
}

#[test]
fn test_page_must_match_canvas_type() {
    let body = r#"
      <canvasList>
        <canvas name="T" type="TAB">
          <stackedPageList><stackedPage name="P"/></stackedPageList>
        </canvas>
      </canvasList>"#;
    let err = load("PAGES", body).unwrap_err();
    assert_eq!(err.key(), MessageKey::InvalidCanvasPlacement);
}

#[test]
fn test_initial_stacked_page_must_exist() {
    let body = r#"
      <canvasList>
        <canvas name="S" type="STACKED">
          <initialStackedPageName>SECOND</initialStackedPageName>
          <stackedPageList><stackedPage name="FIRST"/></stackedPageList>
        </canvas>
      </canvasList>"#;
    let err = load("STACK", body).unwrap_err();
    assert_eq!(err.key(), MessageKey::StackedPageNotFound);
    assert!(err.message().contains("SECOND"));
}

#[test]
fn test_canvas_names_are_unique_across_pages() {
    let body = r#"
      <canvasList>
        <canvas name="T" type="TAB">
          <tabPageList>
            <tabPage name="A"><canvasList><canvas name="SAME"/></canvasList></tabPage>
            <tabPage name="B"><canvasList><canvas name="SAME"/></canvasList></tabPage>
          </tabPageList>
        </canvas>
      </canvasList>"#;
    let err = load("TWICE", body).unwrap_err();
    assert_eq!(err.key(), MessageKey::DuplicateName);
}

#[test]
fn test_extension_properties_tree() {
    let body = r#"
      <formRendererProperties>
        <property name="gap" type="INTEGER">4</property>
        <property name="caption" multilingual="true">Orders</property>
        <propertyGroup name="layout">
          <property name="align">LEFT</property>
        </propertyGroup>
        <propertyList name="columns">
          <listEntry><property name="title">Id</property></listEntry>
          <listEntry><property name="title">Status</property></listEntry>
        </propertyList>
      </formRendererProperties>"#;
    let form = load("EXT", body).unwrap();
    let group = &form.renderer_properties;

    let gap = group.lookup("gap").unwrap();
    assert_eq!(gap.kind, PropertyKind::Integer);
    assert_eq!(gap.as_i64(), Some(4));
    assert!(group.lookup("caption").unwrap().multilingual);
    assert_eq!(group.lookup("layout.align").unwrap().value.as_deref(), Some("LEFT"));

    let titles: Vec<&str> = group
        .list("columns")
        .unwrap()
        .entries
        .iter()
        .filter_map(|e| e.get("title"))
        .collect();
    assert_eq!(titles, vec!["Id", "Status"]);
}

#[test]
fn test_property_value_is_checked_against_kind() {
    let body = r#"
      <formRendererProperties>
        <property name="visible" type="BOOLEAN">maybe</property>
      </formRendererProperties>"#;
    let err = load("KIND", body).unwrap_err();
    assert_eq!(err.key(), MessageKey::InvalidValue);
}

#[test]
fn test_nested_item_groups_on_query_screen() {
    let body = r#"
      <blockList>
        <block name="B">
          <itemList><item name="X"/><item name="Y"/></itemList>
          <queryScreen>
            <itemGroupList>
              <itemGroup name="OUTER">
                <separator>true</separator>
                <itemList><item referencedItemName="X"/></itemList>
                <itemGroupList>
                  <itemGroup name="INNER">
                    <frameTitle>Inner</frameTitle>
                    <itemList><item referencedItemName="Y"/></itemList>
                  </itemGroup>
                </itemGroupList>
              </itemGroup>
            </itemGroupList>
          </queryScreen>
        </block>
      </blockList>"#;
    let form = load("NESTED", body).unwrap();
    let screen = form.require_block("B").unwrap().screen(ScreenType::Query);

    assert!(screen.find_group("OUTER").unwrap().separator);
    let inner = screen.find_group("INNER").unwrap();
    assert_eq!(inner.frame_title.as_deref(), Some("Inner"));
    let items: Vec<&str> = screen.all_items().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(items, vec!["X", "Y"]);
    assert!(screen.all_items().iter().all(|i| i.screen == ScreenType::Query));
}

#[test]
fn test_mismatched_end_tag_aborts() {
    let source = common::source().with(
        DefinitionKind::Form,
        "BROKEN",
        r#"<form name="BROKEN"><blockList></canvasList></form>"#,
    );
    let err = common::loader(source).load_form("BROKEN").unwrap_err();
    assert_eq!(err.key(), MessageKey::MalformedSource);
}

#[test]
fn test_block_canvas_must_exist() {
    let body = r#"
      <blockList>
        <block name="B"><canvasName>NOWHERE</canvasName><itemList><item name="X"/></itemList></block>
      </blockList>"#;
    let err = load("NOCANVAS", body).unwrap_err();
    assert_eq!(err.key(), MessageKey::CanvasNotFound);
}

#[test]
fn test_mapping_must_name_a_lov_definition() {
    let body = r#"
      <blockList>
        <block name="B">
          <itemList><item name="X"/></itemList>
          <lovMappingList>
            <lovMapping name="M" lovDefinitionName="MISSING">
              <itemMapList><itemMap lovDefinitionItem="A" blockItem="X"/></itemMapList>
            </lovMapping>
          </lovMappingList>
        </block>
      </blockList>"#;
    let err = load("NOLOV", body).unwrap_err();
    assert_eq!(err.key(), MessageKey::LovDefinitionNotFound);
}

#[test]
fn test_item_mapping_must_name_a_mapping() {
    let body = r#"
      <blockList>
        <block name="B">
          <itemList><item name="X"><lovMappingName>NONE</lovMappingName></item></itemList>
        </block>
      </blockList>"#;
    let err = load("NOMAP", body).unwrap_err();
    assert_eq!(err.key(), MessageKey::LovMappingNotFound);
}
