//! Shared fixtures for the loader integration tests.
#![allow(dead_code)]

use formdef::{ComponentRegistry, DefinitionKind, DefinitionLoader, InMemorySource, LoaderConfig};

pub const APPLICATION: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<applicationProperties>
  <connectionFactory>jdbc.default</connectionFactory>
  <translator>i18n.default</translator>
  <applicationParameterList>
    <parameter name="COMPANY" dataType="STRING" defaultValue="ACME"/>
  </applicationParameterList>
  <visualAttributeList>
    <visualAttribute name="Highlight">
      <fontWeight>bold</fontWeight>
      <foregroundColor>#FF0000</foregroundColor>
    </visualAttribute>
  </visualAttributeList>
  <formRendererList>
    <renderer name="StandardForm" implementation="ui.form.Standard"/>
  </formRendererList>
  <blockRendererList>
    <renderer name="Grid" implementation="ui.block.Grid"/>
  </blockRendererList>
  <itemRendererList>
    <renderer name="Text" implementation="ui.item.Text"/>
  </itemRendererList>
  <lovRendererList>
    <renderer name="Picker" implementation="ui.lov.Picker"/>
  </lovRendererList>
  <appComponentRendererList>
    <renderer name="Navigator" implementation="ui.app.Navigator"/>
  </appComponentRendererList>
  <applicationMenuList>
    <applicationMenu name="MAIN" default="true">
      <leafList>
        <leaf type="BRANCH" name="SALES">
          <displayName>Sales</displayName>
          <leafList>
            <leaf type="FORM" name="ORDERS_LEAF">
              <displayName>Orders</displayName>
              <formName>ORDERS</formName>
            </leaf>
            <leaf type="SPACER"/>
            <leaf type="ACTION" name="EXIT">
              <actionCommand>exit</actionCommand>
            </leaf>
          </leafList>
        </leaf>
      </leafList>
    </applicationMenu>
  </applicationMenuList>
  <applicationLayout>
    <title>Demo</title>
    <layoutItemList>
      <layoutItem type="SPLIT" name="BODY">
        <orientation>HORIZONTAL</orientation>
        <layoutItemList>
          <layoutItem type="COMPONENT" name="NAV">
            <rendererName>Navigator</rendererName>
          </layoutItem>
          <layoutItem type="SPACE"/>
        </layoutItemList>
      </layoutItem>
    </layoutItemList>
  </applicationLayout>
</applicationProperties>
"##;

pub const ORDERS_FORM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<form name="ORDERS">
  <title>Orders</title>
  <formRendererName>StandardForm</formRendererName>
  <firstNavigableBlock>ORDER</firstNavigableBlock>
  <formParameterList>
    <formParameter name="ORDER_ID" dataType="INTEGER"/>
  </formParameterList>
  <canvasList>
    <canvas name="MAIN" type="CONTENT">
      <width>800</width>
      <canvasList>
        <canvas name="TABS" type="TAB">
          <tabPageList>
            <tabPage name="HEADER">
              <pageTitle>Header</pageTitle>
              <canvasList>
                <canvas name="HEADER_CONTENT" type="CONTENT"/>
              </canvasList>
            </tabPage>
            <tabPage name="LINES">
              <canvasList>
                <canvas name="LINES_CONTENT"/>
              </canvasList>
            </tabPage>
          </tabPageList>
        </canvas>
      </canvasList>
    </canvas>
    <canvas name="CONFIRM" type="POPUP">
      <popupPageTitle>Confirm</popupPageTitle>
    </canvas>
  </canvasList>
  <lovDefinitionList>
    <lovDefinition name="STATUSES">
      <lovRendererName>Picker</lovRendererName>
      <block name="STATUS_LOV">
        <itemList>
          <item name="CODE"/>
          <item name="LABEL"/>
        </itemList>
      </block>
    </lovDefinition>
  </lovDefinitionList>
  <blockList>
    <block name="ORDER">
      <canvasName>HEADER_CONTENT</canvasName>
      <blockRendererName>Grid</blockRendererName>
      <itemList>
        <item name="ID">
          <dataType>INTEGER</dataType>
        </item>
        <item name="STATUS">
          <lovMappingName>STATUS_MAP</lovMappingName>
          <itemRendererName>Text</itemRendererName>
          <visualAttributeName>Highlight</visualAttributeName>
        </item>
      </itemList>
      <lovMappingList>
        <lovMapping name="STATUS_MAP" lovDefinitionName="STATUSES">
          <itemMapList>
            <itemMap lovDefinitionItem="CODE" blockItem="STATUS"/>
          </itemMapList>
        </lovMapping>
      </lovMappingList>
      <mainScreen>
        <numCols>2</numCols>
        <itemGroupList>
          <itemGroup name="G1">
            <itemList>
              <item referencedItemName="ID">
                <label>Id</label>
              </item>
              <item isSpacerItem="true"/>
              <item referencedItemName="STATUS"/>
            </itemList>
          </itemGroup>
        </itemGroupList>
      </mainScreen>
    </block>
    <block name="LINE">
      <canvasName>LINES_CONTENT</canvasName>
      <itemList>
        <item name="ORDER_ID"/>
        <item name="PRODUCT"/>
      </itemList>
    </block>
  </blockList>
  <relationList>
    <relation name="ORDER_LINES" masterBlockName="ORDER" detailBlockName="LINE">
      <joinList>
        <join masterItem="ID" detailItem="ORDER_ID"/>
      </joinList>
    </relation>
  </relationList>
</form>
"#;

/// Application properties plus the ORDERS form.
pub fn source() -> InMemorySource {
    InMemorySource::new()
        .with(DefinitionKind::Application, "application", APPLICATION)
        .with(DefinitionKind::Form, "ORDERS", ORDERS_FORM)
}

pub fn loader(source: InMemorySource) -> DefinitionLoader {
    loader_with(LoaderConfig::default(), source)
}

pub fn loader_with(config: LoaderConfig, source: InMemorySource) -> DefinitionLoader {
    DefinitionLoader::new(config, source, ComponentRegistry::new()).expect("loader")
}

/// A minimal form around `body`, named `name`.
pub fn form(name: &str, body: &str) -> String {
    format!(r#"<?xml version="1.0" encoding="UTF-8"?><form name="{}">{}</form>"#, name, body)
}
