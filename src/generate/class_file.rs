//! Generator for the Java class of each model class.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::json;

use crate::context::ServiceContext;
use crate::error::Result;
use crate::fragments::{
    attribute_key, constructor_key, import_key, method_key, FragmentMap, CLASS, CLASS_END, PACKAGE,
};
use crate::generate::{capitalize, FileGenerator};
use crate::model::{AssocRole, ClassModel, Clazz, FMethod, BEAN};
use crate::signature::Signature;
use crate::templates::{java, TemplateRenderer};

/// Snapshot file kept next to the generated classes.
pub const SNAPSHOT_FILE: &str = "classModel.yaml";

const NO_PARAMS: [&str; 0] = [];

/// Generates `<package folder>/<Class>.java` with fields, accessors,
/// association maintenance, and hand-declared methods.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClassFileGenerator;

impl FileGenerator for ClassFileGenerator {
    fn snapshot_file_name(&self) -> &str {
        SNAPSHOT_FILE
    }

    fn file_path(&self, model: &ClassModel, clazz: &Clazz) -> PathBuf {
        Path::new(&model.package_src_folder()).join(format!("{}.java", clazz.name))
    }

    fn generate(
        &self,
        ctx: &ServiceContext,
        model: &ClassModel,
        clazz: &Clazz,
        fragments: &mut FragmentMap,
    ) -> Result<()> {
        let mut out = ClassWriter { templates: &ctx.templates, model, clazz, fragments };
        out.skeleton()?;
        out.imports()?;
        out.attributes()?;
        out.roles()?;
        out.methods()?;
        out.property_change_support()?;
        out.to_string_method()?;
        out.remove_you()
    }
}

struct ClassWriter<'a> {
    templates: &'a TemplateRenderer,
    model: &'a ClassModel,
    clazz: &'a Clazz,
    fragments: &'a mut FragmentMap,
}

/// Counterpart details a role's templates need.
struct Counterpart<'a> {
    class: &'a str,
    name: Option<&'a str>,
    many: bool,
}

/// Resolves the other side of `role`; `None` for unlinked roles.
fn counterpart<'m>(model: &'m ClassModel, role: &'m AssocRole) -> Option<Counterpart<'m>> {
    let other_ref = role.other.as_ref()?;
    let other = model.role(other_ref);
    Some(Counterpart {
        class: &other_ref.class,
        name: other.and_then(|o| o.name.as_deref()),
        many: other.is_some_and(AssocRole::is_many),
    })
}

impl ClassWriter<'_> {
    fn skeleton(&mut self) -> Result<()> {
        let package = self.templates.render(java::PACKAGE, &json!({ "packageName": self.model.package_name }))?;
        self.fragments.upsert(PACKAGE, &package, 2, false);

        let decl = self.templates.render(
            java::CLASS_DECL,
            &json!({ "name": self.clazz.name, "superClass": self.clazz.super_class }),
        )?;
        self.fragments.upsert(CLASS, &decl, 2, false);

        let end = self.templates.render(java::CLASS_END, &json!({}))?;
        self.fragments.upsert(CLASS_END, &end, 1, false);
        Ok(())
    }

    fn imports(&mut self) -> Result<()> {
        let mut imports: Vec<String> = Vec::new();
        if !self.clazz.attributes.is_empty() {
            imports.push("java.util.Objects".to_string());
        }
        for (_, role) in self.clazz.named_roles().filter(|(_, r)| r.is_many()) {
            for import in ["java.util.List", "java.util.Collections"] {
                imports.push(import.to_string());
            }
            if !role.role_type.contains('.') {
                imports.push(format!("java.util.{}", role.role_type));
            }
        }
        if self.uses_bean() {
            imports.push("java.beans.PropertyChangeSupport".to_string());
        }

        let mut seen = HashSet::new();
        for import in imports.into_iter().filter(|i| seen.insert(i.clone())) {
            let text = self.templates.render(java::IMPORT, &json!({ "qualifiedName": import }))?;
            self.fragments.upsert(&import_key(&import), &text, 1, false);
        }
        Ok(())
    }

    fn attributes(&mut self) -> Result<()> {
        for attr in &self.clazz.attributes {
            let cap = capitalize(&attr.name);
            let bindings = json!({
                "className": self.clazz.name,
                "name": attr.name,
                "capName": cap,
                "type": attr.attr_type,
                "init": attr.initialization,
                "bean": attr.property_style == BEAN,
            });
            let remove = attr.modified;

            let decl = self.templates.render(java::ATTR_DECL, &bindings)?;
            self.fragments.upsert(&attribute_key(&attr.name), &decl, 2, remove);

            let getter = self.templates.render(java::ATTR_GET, &bindings)?;
            let key = method_key(&Signature::new(format!("get{cap}"), NO_PARAMS));
            self.fragments.upsert(&key, &getter, 2, remove);

            let setter = self.templates.render(java::ATTR_SET, &bindings)?;
            let key = method_key(&Signature::new(format!("set{cap}"), [&attr.attr_type]));
            self.fragments.upsert(&key, &setter, 2, remove);
        }
        Ok(())
    }

    fn roles(&mut self) -> Result<()> {
        for (name, role) in self.clazz.named_roles() {
            let Some(other) = counterpart(self.model, role) else {
                continue;
            };
            let cap = capitalize(name);
            let bindings = json!({
                "className": self.clazz.name,
                "name": name,
                "capName": cap,
                "type": other.class,
                "otherClass": other.class,
                "otherNamed": other.name.is_some(),
                "otherCapName": other.name.map(capitalize).unwrap_or_default(),
                "otherMany": other.many,
                "roleType": role.role_type,
                "bean": role.property_style == BEAN,
            });
            let remove = role.modified;
            let getter_key = method_key(&Signature::new(format!("get{cap}"), NO_PARAMS));

            if role.is_many() {
                let decl = self.templates.render(java::ROLE_MANY_DECL, &bindings)?;
                self.fragments.upsert(&attribute_key(name), &decl, 2, remove);

                let getter = self.templates.render(java::ROLE_MANY_GET, &bindings)?;
                self.fragments.upsert(&getter_key, &getter, 2, remove);

                let varargs = [format!("{}...", other.class)];
                let with = self.templates.render(java::ROLE_MANY_WITH, &bindings)?;
                let key = method_key(&Signature::new(format!("with{cap}"), &varargs));
                self.fragments.upsert(&key, &with, 2, remove);

                let without = self.templates.render(java::ROLE_MANY_WITHOUT, &bindings)?;
                let key = method_key(&Signature::new(format!("without{cap}"), &varargs));
                self.fragments.upsert(&key, &without, 2, remove);
            } else {
                let decl = self.templates.render(java::ROLE_ONE_DECL, &bindings)?;
                self.fragments.upsert(&attribute_key(name), &decl, 2, remove);

                let getter = self.templates.render(java::ATTR_GET, &bindings)?;
                self.fragments.upsert(&getter_key, &getter, 2, remove);

                let setter = self.templates.render(java::ROLE_ONE_SET, &bindings)?;
                let key = method_key(&Signature::new(format!("set{cap}"), [other.class]));
                self.fragments.upsert(&key, &setter, 2, remove);
            }
        }
        Ok(())
    }

    fn methods(&mut self) -> Result<()> {
        for method in &self.clazz.methods {
            let text = self.templates.render(
                java::METHOD,
                &json!({ "declaration": method.declaration.trim(), "body": method.body.trim() }),
            )?;
            let key = self.method_fragment_key(method);
            self.fragments.upsert(&key, &text, 2, method.modified);
        }
        Ok(())
    }

    /// Declarations named after the class are constructors.
    fn method_fragment_key(&self, method: &FMethod) -> String {
        let signature = method.signature();
        if signature.name == self.clazz.name {
            constructor_key(&signature)
        } else {
            method_key(&signature)
        }
    }

    fn uses_bean(&self) -> bool {
        self.clazz.attributes.iter().any(|a| a.property_style == BEAN)
            || self.clazz.named_roles().any(|(_, r)| r.property_style == BEAN)
    }

    fn property_change_support(&mut self) -> Result<()> {
        let remove = self.clazz.modified || !self.uses_bean();
        let empty = json!({});

        let decl = self.templates.render(java::LISTENERS_DECL, &empty)?;
        self.fragments.upsert(&attribute_key("listeners"), &decl, 2, remove);

        let fire = self.templates.render(java::FIRE_PROPERTY_CHANGE, &empty)?;
        let key = method_key(&Signature::new("firePropertyChange", ["String", "Object", "Object"]));
        self.fragments.upsert(&key, &fire, 2, remove);

        let get = self.templates.render(java::LISTENERS_GET, &empty)?;
        let key = method_key(&Signature::new("listeners", NO_PARAMS));
        self.fragments.upsert(&key, &get, 2, remove);
        Ok(())
    }

    fn to_string_method(&mut self) -> Result<()> {
        let names: Vec<String> = self
            .clazz
            .attributes
            .iter()
            .filter(|a| a.attr_type == "String")
            .map(|a| capitalize(&a.name))
            .collect();
        let remove = self.clazz.modified || names.is_empty();
        let text = self.templates.render(java::TO_STRING, &json!({ "names": names }))?;
        let key = method_key(&Signature::new("toString", NO_PARAMS));
        self.fragments.upsert(&key, &text, 2, remove);
        Ok(())
    }

    fn remove_you(&mut self) -> Result<()> {
        let mut roles = Vec::new();
        for (name, role) in self.clazz.named_roles() {
            if let Some(other) = counterpart(self.model, role) {
                roles.push(json!({
                    "capName": capitalize(name),
                    "many": role.is_many(),
                    "otherClass": other.class,
                }));
            }
        }
        let remove = self.clazz.modified || roles.is_empty();
        let text = self.templates.render(java::REMOVE_YOU, &json!({ "roles": roles }))?;
        let key = method_key(&Signature::new("removeYou", NO_PARAMS));
        self.fragments.upsert(&key, &text, 2, remove);
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

    fn ctx() -> ServiceContext {
        ServiceContext::with_fs(Box::new(MemoryFileSystem::new()))
    }

    fn school() -> ClassModel {
        let mut mb = ClassModelBuilder::new("org.school").unwrap();
        mb.build_class("Student")
            .unwrap()
            .build_attribute("name", "String")
            .unwrap()
            .build_attribute_with_init("credits", "int", "0")
            .unwrap();
        mb.build_class("Teacher").unwrap().build_method("public int load(int hours)", "return hours;").unwrap();
        mb.build_association("Teacher", "students", Cardinality::Many, "Student", "teacher", Cardinality::One)
            .unwrap();
        mb.finish()
    }

    fn generate(model: &ClassModel, name: &str) -> FragmentMap {
        let mut fragments = FragmentMap::new();
        ClassFileGenerator
            .generate(&ctx(), model, model.class(name).unwrap(), &mut fragments)
            .unwrap();
        fragments
    }

    #[test]
    fn file_path_follows_package_folder() {
        let model = school();
        let path = ClassFileGenerator.file_path(&model, model.class("Student").unwrap());
        assert_eq!(path, PathBuf::from("src/main/java/org/school/Student.java"));
    }

    #[test]
    fn attributes_get_constant_field_and_accessors() {
        let fragments = generate(&school(), "Student");

        let decl = &fragments.get("attribute:credits").unwrap().text;
        assert!(decl.contains("public static final String PROPERTY_credits = \"credits\";"));
        assert!(decl.contains("private int credits = 0;"));
        assert!(fragments.get("method:getCredits()").is_some());
        assert!(fragments.get("method:setCredits(int)").is_some());
        assert!(fragments.get("method:toString()").unwrap().text.contains("this.getName()"));
        assert!(fragments.get("import:java.util.Objects").is_some());
    }

    #[test]
    fn association_sides_call_each_other() {
        let model = school();
        let teacher = generate(&model, "Teacher");
        let student = generate(&model, "Student");

        let with = &teacher.get("method:withStudents(Student...)").unwrap().text;
        assert!(with.contains("item.setTeacher(this);"));
        assert!(with.contains("new ArrayList<>()"));
        assert!(teacher.get("method:withoutStudents(Student...)").is_some());
        assert!(teacher.get("import:java.util.ArrayList").is_some());

        let set = &student.get("method:setTeacher(Teacher)").unwrap().text;
        assert!(set.contains("oldValue.withoutStudents(this);"));
        assert!(set.contains("value.withStudents(this);"));
        assert!(student.get("method:removeYou()").unwrap().text.contains("this.setTeacher(null);"));
    }

    #[test]
    fn hand_methods_are_keyed_by_signature() {
        let fragments = generate(&school(), "Teacher");
        let text = &fragments.get("method:load(int)").unwrap().text;
        assert_eq!(text, "   public int load(int hours)\n   {\n      return hours;\n   }");
        assert!(fragments.get("method:toString()").is_none());
    }

    #[test]
    fn bean_style_adds_property_change_support() {
        let mut model = school();
        model.class_mut("Student").unwrap().attributes[0].property_style = BEAN.into();
        let fragments = generate(&model, "Student");

        assert!(fragments.get("attribute:listeners").is_some());
        assert!(fragments.get("method:firePropertyChange(String,Object,Object)").is_some());
        assert!(fragments.get("import:java.beans.PropertyChangeSupport").is_some());
        assert!(fragments
            .get("method:setName(String)")
            .unwrap()
            .text
            .contains("this.firePropertyChange(PROPERTY_name, oldValue, value);"));
        assert!(generate(&school(), "Student").get("attribute:listeners").is_none());
    }

    #[test]
    fn generated_file_parses_back_to_the_same_keys() {
        let fragments = generate(&school(), "Teacher");
        let reparsed = parser::parse(&fragments.render());

        let keys = |map: &FragmentMap| -> Vec<String> {
            map.keys().filter(|k| *k != crate::fragments::GAP).map(str::to_string).collect()
        };
        assert_eq!(keys(&reparsed), keys(&fragments));
        assert_eq!(reparsed.render(), fragments.render());
    }

    #[test]
    fn regenerating_into_parsed_file_is_stable() {
        let model = school();
        let first = generate(&model, "Student").render();

        let mut reparsed = parser::parse(&first);
        ClassFileGenerator
            .generate(&ctx(), &model, model.class("Student").unwrap(), &mut reparsed)
            .unwrap();

        assert_eq!(reparsed.render(), first);
    }

    #[test]
    fn constructors_in_methods_use_constructor_keys() {
        let mut mb = ClassModelBuilder::new("p").unwrap();
        mb.build_class("Point").unwrap().build_method("public Point(int x)", "").unwrap();
        let fragments = generate(&mb.finish(), "Point");
        assert!(fragments.get("constructor:Point(int)").is_some());
    }
}
