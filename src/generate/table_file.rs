//! Generator for relational table helper classes.
//!
//! For every model class `X` a class `XTable` is generated under the
//! `tables` sub-package. A table holds rows of objects; each role of `X`
//! gets an `expand` method adding a column of partner objects and a `has`
//! method filtering rows by an existing link.

use std::path::{Path, PathBuf};

use serde_json::json;

use crate::context::ServiceContext;
use crate::error::Result;
use crate::fragments::{
    attribute_key, constructor_key, import_key, method_key, FragmentMap, CLASS, CLASS_END, PACKAGE,
};
use crate::generate::{capitalize, FileGenerator};
use crate::model::{ClassModel, Clazz};
use crate::signature::Signature;
use crate::templates::java;

/// Snapshot file kept next to the generated classes.
pub const SNAPSHOT_FILE: &str = "tablesClassModel.yaml";

/// Sub-package the table classes live in.
pub const TABLES_PACKAGE: &str = "tables";

/// Row storage, current column, and column positions of every table.
const STANDARD_ATTRIBUTES: [(&str, &str, &str); 3] = [
    ("table", "ArrayList<ArrayList<Object>>", "new ArrayList<>()"),
    ("columnName", "String", "null"),
    ("columnMap", "LinkedHashMap<String, Integer>", "new LinkedHashMap<>()"),
];

const FIXED_IMPORTS: [&str; 3] = ["java.util.ArrayList", "java.util.LinkedHashMap", "java.util.LinkedHashSet"];

const NO_PARAMS: [&str; 0] = [];

/// Generates `<package folder>/tables/<Class>Table.java`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableFileGenerator;

fn table_name(class_name: &str) -> String {
    format!("{class_name}Table")
}

impl FileGenerator for TableFileGenerator {
    fn snapshot_file_name(&self) -> &str {
        SNAPSHOT_FILE
    }

    fn file_path(&self, model: &ClassModel, clazz: &Clazz) -> PathBuf {
        Path::new(&model.package_src_folder())
            .join(TABLES_PACKAGE)
            .join(format!("{}.java", table_name(&clazz.name)))
    }

    fn generate(
        &self,
        ctx: &ServiceContext,
        model: &ClassModel,
        clazz: &Clazz,
        fragments: &mut FragmentMap,
    ) -> Result<()> {
        let templates = &ctx.templates;
        let table = table_name(&clazz.name);
        let purge_all = clazz.modified;

        let package = templates.render(
            java::PACKAGE,
            &json!({ "packageName": format!("{}.{TABLES_PACKAGE}", model.package_name) }),
        )?;
        fragments.upsert(PACKAGE, &package, 2, false);
        let decl = templates.render(
            java::CLASS_DECL,
            &json!({ "name": table, "superClass": clazz.super_class.as_deref().map(table_name) }),
        )?;
        fragments.upsert(CLASS, &decl, 2, false);
        fragments.upsert(CLASS_END, &templates.render(java::CLASS_END, &json!({}))?, 1, false);

        let mut imports: Vec<String> = FIXED_IMPORTS.iter().map(ToString::to_string).collect();
        imports.push(format!("{}.{}", model.package_name, clazz.name));
        for (_, role) in clazz.named_roles() {
            if let Some(other) = &role.other {
                imports.push(format!("{}.{}", model.package_name, other.class));
            }
        }
        for import in &imports {
            let text = templates.render(java::IMPORT, &json!({ "qualifiedName": import }))?;
            fragments.upsert(&import_key(import), &text, 1, false);
        }

        let constructor = templates.render(java::TABLE_CONSTRUCTOR, &json!({ "className": clazz.name }))?;
        let key = constructor_key(&Signature::new(&table, [format!("{}...", clazz.name)]));
        fragments.upsert(&key, &constructor, 2, purge_all);

        for (name, attr_type, init) in STANDARD_ATTRIBUTES {
            let cap = capitalize(name);
            let bindings = json!({
                "className": table,
                "name": name,
                "capName": cap,
                "type": attr_type,
                "init": init,
                "bean": false,
            });
            let decl = templates.render(java::ATTR_DECL, &bindings)?;
            fragments.upsert(&attribute_key(name), &decl, 2, purge_all);
            let getter = templates.render(java::ATTR_GET, &bindings)?;
            let key = method_key(&Signature::new(format!("get{cap}"), NO_PARAMS));
            fragments.upsert(&key, &getter, 2, purge_all);
            let setter = templates.render(java::SIMPLE_ATTR_SET, &bindings)?;
            let key = method_key(&Signature::new(format!("set{cap}"), [attr_type]));
            fragments.upsert(&key, &setter, 2, purge_all);
        }

        for attr in &clazz.attributes {
            let cap = capitalize(&attr.name);
            let text = templates.render(
                java::TABLE_EXPAND_ATTRIBUTE,
                &json!({ "className": clazz.name, "capName": cap }),
            )?;
            let key = method_key(&Signature::new(format!("expand{cap}"), ["String..."]));
            fragments.upsert(&key, &text, 2, attr.modified);
        }

        for (name, role) in clazz.named_roles() {
            let Some(other) = &role.other else {
                continue;
            };
            let cap = capitalize(name);
            let bindings = json!({
                "className": clazz.name,
                "capName": cap,
                "otherClass": other.class,
                "many": role.is_many(),
            });
            let expand = templates.render(java::TABLE_EXPAND_ROLE, &bindings)?;
            let key = method_key(&Signature::new(format!("expand{cap}"), ["String..."]));
            fragments.upsert(&key, &expand, 2, role.modified);

            let has = templates.render(java::TABLE_HAS_ROLE, &bindings)?;
            let key = method_key(&Signature::new(format!("has{cap}"), [table_name(&other.class)]));
            fragments.upsert(&key, &has, 2, role.modified);
        }

        // Subclass tables inherit toSet from the superclass table.
        let to_set = templates.render(java::TABLE_TO_SET, &json!({ "className": clazz.name }))?;
        let key = method_key(&Signature::new("toSet", NO_PARAMS));
        fragments.upsert(&key, &to_set, 2, purge_all || clazz.super_class.is_some());

        let to_string = templates.render(java::TABLE_TO_STRING, &json!({}))?;
        let key = method_key(&Signature::new("toString", NO_PARAMS));
        fragments.upsert(&key, &to_string, 2, purge_all);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemoryFileSystem;
    use crate::fragments::parser;
    use crate::model::builder::ClassModelBuilder;
    use crate::model::Cardinality;

    fn model() -> ClassModel {
        let mut mb = ClassModelBuilder::new("org.shop").unwrap();
        mb.build_class("Customer").unwrap().build_attribute("name", "String").unwrap();
        mb.build_class("Order").unwrap();
        mb.build_class("RushOrder").unwrap().set_super_class("Order").unwrap();
        mb.build_association("Customer", "orders", Cardinality::Many, "Order", "customer", Cardinality::One)
            .unwrap();
        mb.finish()
    }

    fn generate(model: &ClassModel, name: &str) -> FragmentMap {
        let ctx = ServiceContext::with_fs(Box::new(MemoryFileSystem::new()));
        let mut fragments = FragmentMap::new();
        TableFileGenerator.generate(&ctx, model, model.class(name).unwrap(), &mut fragments).unwrap();
        fragments
    }

    #[test]
    fn table_lives_in_tables_subpackage() {
        let model = model();
        let path = TableFileGenerator.file_path(&model, model.class("Customer").unwrap());
        assert_eq!(path, PathBuf::from("src/main/java/org/shop/tables/CustomerTable.java"));

        let fragments = generate(&model, "Customer");
        assert_eq!(fragments.get(PACKAGE).unwrap().text, "package org.shop.tables;");
        assert!(fragments.get("import:org.shop.Customer").is_some());
        assert!(fragments.get("import:org.shop.Order").is_some());
    }

    #[test]
    fn standard_members_and_constructor_are_generated() {
        let fragments = generate(&model(), "Customer");
        assert!(fragments.get("constructor:CustomerTable(Customer...)").is_some());
        assert!(fragments.get("attribute:table").is_some());
        assert!(fragments.get("method:setColumnMap(LinkedHashMap<String,Integer>)").is_some());
        assert!(fragments.get("method:expandName(String...)").is_some());
        assert!(fragments.get("method:toSet()").is_some());
    }

    #[test]
    fn roles_get_expand_and_has_methods() {
        let fragments = generate(&model(), "Customer");
        let expand = &fragments.get("method:expandOrders(String...)").unwrap().text;
        assert!(expand.starts_with("   public OrderTable expandOrders(String... rowName)"));
        assert!(expand.contains("for (final Order current : start.getOrders())"));
        assert!(fragments.get("method:hasOrders(OrderTable)").is_some());
    }

    #[test]
    fn subclass_table_extends_superclass_table_without_to_set() {
        let fragments = generate(&model(), "RushOrder");
        assert_eq!(fragments.get(CLASS).unwrap().text, "public class RushOrderTable extends OrderTable\n{");
        assert!(fragments.get("method:toSet()").is_none());
    }

    #[test]
    fn generated_table_reparses_to_same_keys() {
        let fragments = generate(&model(), "Customer");
        let reparsed = parser::parse(&fragments.render());
        let keys = |map: &FragmentMap| -> Vec<String> {
            map.keys().filter(|k| *k != crate::fragments::GAP).map(str::to_string).collect()
        };
        assert_eq!(keys(&reparsed), keys(&fragments));
    }
}
