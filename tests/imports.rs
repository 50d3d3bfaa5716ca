//! Referenced blocks, reusable LOV definitions and object groups.

mod common;

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use formdef::{DefinitionKind, InMemorySource, MessageKey};
use pretty_assertions::assert_eq;

const CUSTOMER_BLOCK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<blockDefinition>
  <lovDefinitionList>
    <lovDefinition name="CUSTOMERS" isReferenced="true" referencedLovDefinitionName="CUSTOMERS"/>
    <lovDefinition name="LOCAL_CONTACTS">
      <block name="CONTACTS_LOV">
        <itemList>
          <item name="CONTACT_ID"/>
          <item name="CUSTOMER_ID">
            <defaultQueryValue>BLOCK_ITEM:CUSTOMER_BLOCK.CUSTOMER_ID</defaultQueryValue>
          </item>
        </itemList>
      </block>
    </lovDefinition>
  </lovDefinitionList>
  <block name="CUSTOMER_BLOCK">
    <itemList>
      <item name="CUSTOMER_ID">
        <lovMappingName>CUSTOMER_MAP</lovMappingName>
        <itemRendererProperties>
          <property name="lov" type="LOV_DEFINITION">CUSTOMERS</property>
        </itemRendererProperties>
      </item>
      <item name="STATUS">
        <defaultQueryValue>ANY</defaultQueryValue>
      </item>
    </itemList>
    <lovMappingList>
      <lovMapping name="CUSTOMER_MAP" lovDefinitionName="CUSTOMERS">
        <itemMapList>
          <itemMap lovDefinitionItem="ID" blockItem="CUSTOMER_ID"/>
        </itemMapList>
      </lovMapping>
    </lovMappingList>
  </block>
</blockDefinition>
"#;

const CUSTOMERS_LOV: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<lovDefinition>
  <lovRendererName>Picker</lovRendererName>
  <block name="CUSTOMERS_LOV">
    <itemList>
      <item name="ID"/>
      <item name="NAME"/>
    </itemList>
  </block>
</lovDefinition>
"#;

const INVOICE_BODY: &str = r#"
  <canvasList><canvas name="MAIN"/></canvasList>
  <blockList>
    <block name="A" referenced="true" referencedBlockName="CUSTOMER_BLOCK">
      <canvasName>MAIN</canvasName>
      <itemList>
        <item name="STATUS"><defaultQueryValue>OPEN</defaultQueryValue></item>
      </itemList>
    </block>
    <block name="B" referenced="true" referencedBlockName="CUSTOMER_BLOCK"/>
  </blockList>"#;

fn reusable_source() -> InMemorySource {
    common::source()
        .with(DefinitionKind::ReusableBlock, "CUSTOMER_BLOCK", CUSTOMER_BLOCK)
        .with(DefinitionKind::ReusableLov, "CUSTOMERS", CUSTOMERS_LOV)
        .with(DefinitionKind::Form, "INVOICE", common::form("INVOICE", INVOICE_BODY))
}

#[test]
fn test_referenced_block_takes_host_alias() {
    let loader = common::loader(reusable_source());
    let form = loader.load_form("INVOICE").unwrap();

    let a = form.require_block("A").unwrap();
    assert!(a.is_referenced);
    assert_eq!(a.referenced_block_name.as_deref(), Some("CUSTOMER_BLOCK"));
    assert_eq!(a.canvas_name.as_deref(), Some("MAIN"));
    assert!(a.items.iter().all(|item| item.block_name == "A"));
    assert_eq!(a.lov_mappings.get("CUSTOMER_MAP").unwrap().block_name, "A");

    // хозяин переопределяет только значения по умолчанию
    assert_eq!(a.item("STATUS").unwrap().default_query_value.as_deref(), Some("OPEN"));
    let b = form.require_block("B").unwrap();
    assert_eq!(b.item("STATUS").unwrap().default_query_value.as_deref(), Some("ANY"));
    assert_eq!(b.canvas_name, None);
}

#[test]
fn test_reusable_lov_is_imported_once_per_alias() {
    let loader = common::loader(reusable_source());
    let form = loader.load_form("INVOICE").unwrap();

    let mut names: Vec<&str> = form.lov_definitions.names().collect();
    names.sort_unstable();
    assert_eq!(
        names,
        vec!["A.[CUSTOMERS]", "A.[LOCAL_CONTACTS]", "B.[CUSTOMERS]", "B.[LOCAL_CONTACTS]"]
    );

    let imported = form.require_lov_definition("A.[CUSTOMERS]").unwrap();
    assert!(imported.is_referenced);
    assert_eq!(imported.referenced_lov_definition_name.as_deref(), Some("CUSTOMERS"));
    assert_eq!(imported.renderer_name.as_deref(), Some("Picker"));
    let lov_block = imported.block.as_ref().unwrap();
    assert_eq!(lov_block.lov_definition_name.as_deref(), Some("A.[CUSTOMERS]"));

    // один разбор .lovdef на все импорты
    assert_eq!(loader.cache_stats().lov_definitions.misses, 1);
}

#[test]
fn test_references_follow_the_scoped_lov() {
    let loader = common::loader(reusable_source());
    let form = loader.load_form("INVOICE").unwrap();

    for alias in ["A", "B"] {
        let block = form.require_block(alias).unwrap();
        let scoped = format!("{}.[CUSTOMERS]", alias);
        assert_eq!(block.lov_mappings.get("CUSTOMER_MAP").unwrap().lov_definition_name, scoped);
        let item = block.item("CUSTOMER_ID").unwrap();
        assert_eq!(item.renderer_properties.value("lov"), Some(scoped.as_str()));
    }
}

#[test]
fn test_block_item_references_are_rewritten_to_alias() {
    let loader = common::loader(reusable_source());
    let form = loader.load_form("INVOICE").unwrap();

    let contacts = form.require_lov_definition("A.[LOCAL_CONTACTS]").unwrap();
    let item = contacts.block.as_ref().unwrap().item("CUSTOMER_ID").unwrap();
    assert_eq!(item.default_query_value.as_deref(), Some("BLOCK_ITEM:A.CUSTOMER_ID"));

    let contacts = form.require_lov_definition("B.[LOCAL_CONTACTS]").unwrap();
    let item = contacts.block.as_ref().unwrap().item("CUSTOMER_ID").unwrap();
    assert_eq!(item.default_query_value.as_deref(), Some("BLOCK_ITEM:B.CUSTOMER_ID"));
}

const DIRECT_AND_REFERENCED: &str = r#"
  <lovDefinitionList>
    <lovDefinition name="CUSTOMERS" isReferenced="true" referencedLovDefinitionName="CUSTOMERS"/>
  </lovDefinitionList>
  <blockList>
    <block name="A" referenced="true" referencedBlockName="CUSTOMER_BLOCK"/>
    <block name="PAYMENT">
      <itemList><item name="PAYER_ID"/></itemList>
      <lovMappingList>
        <lovMapping name="PAYER_MAP" lovDefinitionName="CUSTOMERS">
          <itemMapList><itemMap lovDefinitionItem="ID" blockItem="PAYER_ID"/></itemMapList>
        </lovMapping>
      </lovMappingList>
    </block>
  </blockList>"#;

#[test]
fn test_direct_import_is_shared_with_referenced_block() {
    let source = reusable_source().with(
        DefinitionKind::Form,
        "PAYMENTS",
        common::form("PAYMENTS", DIRECT_AND_REFERENCED),
    );
    let loader = common::loader(source);
    let form = loader.load_form("PAYMENTS").unwrap();

    let mut names: Vec<&str> = form.lov_definitions.names().collect();
    names.sort_unstable();
    assert_eq!(names, vec!["A.[LOCAL_CONTACTS]", "[CUSTOMERS]"]);

    let payment = form.require_block("PAYMENT").unwrap();
    assert_eq!(payment.lov_mappings.get("PAYER_MAP").unwrap().lov_definition_name, "[CUSTOMERS]");
    let a = form.require_block("A").unwrap();
    assert_eq!(a.lov_mappings.get("CUSTOMER_MAP").unwrap().lov_definition_name, "[CUSTOMERS]");
    let item = a.item("CUSTOMER_ID").unwrap();
    assert_eq!(item.renderer_properties.value("lov"), Some("[CUSTOMERS]"));
    assert_eq!(loader.cache_stats().lov_definitions.misses, 1);
}

#[test]
fn test_renames_reach_inline_lov_definitions() {
    let body = r#"
      <lovDefinitionList>
        <lovDefinition name="CUSTOMERS" isReferenced="true" referencedLovDefinitionName="CUSTOMERS"/>
        <lovDefinition name="REGIONS">
          <lovRendererProperties>
            <property name="next" type="LOV_DEFINITION">CUSTOMERS</property>
          </lovRendererProperties>
          <block name="REGIONS_LOV">
            <itemList>
              <item name="CODE">
                <itemRendererProperties>
                  <property name="source" type="LOV_DEFINITION_ITEM">CUSTOMERS.NAME</property>
                </itemRendererProperties>
              </item>
            </itemList>
            <lovMappingList>
              <lovMapping name="OWNER" lovDefinitionName="CUSTOMERS">
                <itemMapList><itemMap lovDefinitionItem="ID" blockItem="CODE"/></itemMapList>
              </lovMapping>
            </lovMappingList>
          </block>
        </lovDefinition>
      </lovDefinitionList>"#;
    let source = reusable_source().with(DefinitionKind::Form, "REGIONS", common::form("REGIONS", body));
    let form = common::loader(source).load_form("REGIONS").unwrap();

    let regions = form.require_lov_definition("REGIONS").unwrap();
    assert_eq!(regions.renderer_properties.value("next"), Some("[CUSTOMERS]"));
    let lov_block = regions.block.as_ref().unwrap();
    assert_eq!(lov_block.lov_mappings.get("OWNER").unwrap().lov_definition_name, "[CUSTOMERS]");
    let code = lov_block.item("CODE").unwrap();
    assert_eq!(code.renderer_properties.value("source"), Some("[CUSTOMERS].NAME"));
}

#[test]
fn test_cycle_through_lov_definitions_fails_fast() {
    let source = common::source()
        .with(
            DefinitionKind::Form,
            "LOOPY",
            common::form(
                "LOOPY",
                r#"<lovDefinitionList>
                     <lovDefinition name="X" isReferenced="true" referencedLovDefinitionName="X"/>
                   </lovDefinitionList>"#,
            ),
        )
        .with(
            DefinitionKind::ReusableLov,
            "X",
            r#"<lovDefinition><block name="XB" referenced="true" referencedBlockName="B1"/></lovDefinition>"#,
        )
        .with(
            DefinitionKind::ReusableBlock,
            "B1",
            r#"<blockDefinition>
                 <lovDefinitionList>
                   <lovDefinition name="Y" isReferenced="true" referencedLovDefinitionName="Y"/>
                 </lovDefinitionList>
                 <block name="B1"><itemList><item name="ID"/></itemList></block>
               </blockDefinition>"#,
        )
        .with(
            DefinitionKind::ReusableLov,
            "Y",
            r#"<lovDefinition><block name="YB" referenced="true" referencedBlockName="B2"/></lovDefinition>"#,
        )
        .with(
            DefinitionKind::ReusableBlock,
            "B2",
            r#"<blockDefinition>
                 <lovDefinitionList>
                   <lovDefinition name="X" isReferenced="true" referencedLovDefinitionName="X"/>
                 </lovDefinitionList>
                 <block name="B2"><itemList><item name="ID"/></itemList></block>
               </blockDefinition>"#,
        );
    let loader = common::loader(source);

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let _ = tx.send(loader.load_form("LOOPY").map(|_| ()));
    });
    let err = rx
        .recv_timeout(Duration::from_secs(10))
        .expect("load of a cyclic definition returned")
        .unwrap_err();
    assert_eq!(err.key(), MessageKey::CyclicReference);
    assert!(err
        .message()
        .contains("X.lovdef -> B1.block -> Y.lovdef -> B2.block -> X.lovdef"));
}

#[test]
fn test_block_definition_without_alias() {
    let loader = common::loader(reusable_source());
    let definition = loader.load_block_definition("CUSTOMER_BLOCK").unwrap();

    assert_eq!(definition.block.name, "CUSTOMER_BLOCK");
    assert!(definition.lov_definitions.contains("[CUSTOMERS]"));
    assert!(definition.lov_definitions.contains("LOCAL_CONTACTS"));
    assert_eq!(
        definition.block.lov_mappings.get("CUSTOMER_MAP").unwrap().lov_definition_name,
        "[CUSTOMERS]"
    );
}

#[test]
fn test_override_of_unknown_item_fails() {
    let body = r#"
      <blockList>
        <block name="A" referenced="true" referencedBlockName="CUSTOMER_BLOCK">
          <itemList><item name="NOT_THERE"><defaultQueryValue>1</defaultQueryValue></item></itemList>
        </block>
      </blockList>"#;
    let source = reusable_source().with(DefinitionKind::Form, "BAD", common::form("BAD", body));
    let err = common::loader(source).load_form("BAD").unwrap_err();
    assert_eq!(err.key(), MessageKey::NoItemOnBlock);
}

#[test]
fn test_missing_referenced_block() {
    let body = r#"<blockList><block name="A" referenced="true" referencedBlockName="GONE"/></blockList>"#;
    let source = common::source().with(DefinitionKind::Form, "F", common::form("F", body));
    let err = common::loader(source).load_form("F").unwrap_err();
    assert_eq!(err.key(), MessageKey::DefinitionNotFound);
    assert!(err.message().contains("GONE"));
}

const HOST_BODY: &str = r#"
  <canvasList>
    <canvas name="MAIN">
      <width>50</width>
      <canvasList><canvas name="OLD_CHILD"/></canvasList>
    </canvas>
    <canvas name="SIDE"/>
  </canvasList>
  <blockList>
    <block name="HOST_BLOCK">
      <canvasName>SIDE</canvasName>
      <itemList><item name="ID"/></itemList>
    </block>
  </blockList>
  <objectGroupList>
    <objectGroup name="AUDIT"/>
  </objectGroupList>"#;

const AUDIT_GROUP: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<form>
  <canvasList>
    <canvas name="MAIN">
      <width>100</width>
      <canvasList><canvas name="AUDIT_AREA"/></canvasList>
    </canvas>
    <canvas name="AUDIT_POPUP" type="POPUP"/>
  </canvasList>
  <blockList>
    <block name="AUDIT_LOG">
      <canvasName>AUDIT_AREA</canvasName>
      <itemList><item name="HOST_ID"/></itemList>
    </block>
  </blockList>
  <relationList>
    <relation name="HOST_AUDIT" masterBlockName="HOST_BLOCK" detailBlockName="AUDIT_LOG">
      <joinList><join masterItem="ID" detailItem="HOST_ID"/></joinList>
    </relation>
  </relationList>
</form>
"#;

fn object_group_source() -> InMemorySource {
    common::source()
        .with(DefinitionKind::Form, "HOST", common::form("HOST", HOST_BODY))
        .with(DefinitionKind::ObjectGroup, "AUDIT", AUDIT_GROUP)
}

#[test]
fn test_object_group_keeps_host_canvas_geometry() {
    let loader = common::loader(object_group_source());
    let form = loader.load_form("HOST").unwrap();

    let main = form.require_canvas("MAIN").unwrap();
    assert_eq!(main.geometry.width, 50);
    assert!(form.canvas("OLD_CHILD").is_none());
    let area = form.require_canvas("AUDIT_AREA").unwrap();
    assert_eq!(area.content_canvas_name.as_deref(), Some("MAIN"));

    let roots: Vec<&str> = form.canvases.roots().map(|c| c.name.as_str()).collect();
    assert_eq!(roots, vec!["MAIN", "SIDE"]);
    let popups: Vec<&str> = form.canvases.popups().map(|c| c.name.as_str()).collect();
    assert_eq!(popups, vec!["AUDIT_POPUP"]);
    assert_eq!(form.object_groups, vec!["AUDIT".to_string()]);
}

#[test]
fn test_object_group_listed_before_host_canvas() {
    let host = r#"
      <objectGroupList><objectGroup name="FRAME"/></objectGroupList>
      <canvasList>
        <canvas name="MAIN">
          <width>50</width>
          <canvasList><canvas name="OLD_CHILD"/></canvasList>
        </canvas>
      </canvasList>"#;
    let group = r#"<form>
      <canvasList>
        <canvas name="MAIN">
          <width>100</width>
          <canvasList><canvas name="FRAME_AREA"/></canvasList>
        </canvas>
      </canvasList>
    </form>"#;
    let source = common::source()
        .with(DefinitionKind::Form, "EARLY", common::form("EARLY", host))
        .with(DefinitionKind::ObjectGroup, "FRAME", group);
    let form = common::loader(source).load_form("EARLY").unwrap();

    assert_eq!(form.require_canvas("MAIN").unwrap().geometry.width, 50);
    assert!(form.canvas("FRAME_AREA").is_some());
    assert!(form.canvas("OLD_CHILD").is_none());
    let roots: Vec<&str> = form.canvases.roots().map(|c| c.name.as_str()).collect();
    assert_eq!(roots, vec!["MAIN"]);
}

#[test]
fn test_object_group_blocks_relate_to_host_blocks() {
    let loader = common::loader(object_group_source());
    let form = loader.load_form("HOST").unwrap();

    let names: Vec<&str> = form.blocks.names().collect();
    assert_eq!(names, vec!["HOST_BLOCK", "AUDIT_LOG"]);
    let relation = form.relations.get("HOST_AUDIT").unwrap();
    assert_eq!(form.master_block(relation).unwrap().name, "HOST_BLOCK");
    assert_eq!(form.detail_block(relation).unwrap().name, "AUDIT_LOG");
}

#[test]
fn test_object_group_block_name_clash() {
    let group = r#"<form><blockList><block name="HOST_BLOCK"/></blockList></form>"#;
    let source = object_group_source().with(DefinitionKind::ObjectGroup, "AUDIT", group);
    let err = common::loader(source).load_form("HOST").unwrap_err();
    assert_eq!(err.key(), MessageKey::DuplicateName);
}

#[test]
fn test_cyclic_object_group_is_reported() {
    let body = r#"<objectGroupList><objectGroup name="LOOP"/></objectGroupList>"#;
    let looping = r#"<form><objectGroupList><objectGroup name="LOOP"/></objectGroupList></form>"#;
    let source = common::source()
        .with(DefinitionKind::Form, "CYCLE", common::form("CYCLE", body))
        .with(DefinitionKind::ObjectGroup, "LOOP", looping);

    let err = common::loader(source).load_form("CYCLE").unwrap_err();
    assert_eq!(err.key(), MessageKey::CyclicReference);
    assert!(err.message().contains("CYCLE.form -> LOOP.objgroup -> LOOP.objgroup"));
}
