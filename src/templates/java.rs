//! Built-in Java templates.
//!
//! Member templates start with their indentation and end without a trailing
//! newline; the fragment store supplies the blank lines around them. Block
//! helpers never stand alone on a line.

/// Package declaration.
pub const PACKAGE: &str = "package";
/// Import line.
pub const IMPORT: &str = "import";
/// Class declaration up to the opening brace.
pub const CLASS_DECL: &str = "classDecl";
/// Closing brace of the class body.
pub const CLASS_END: &str = "classEnd";
/// Property name constant plus field declaration.
pub const ATTR_DECL: &str = "attrDecl";
/// Plain getter.
pub const ATTR_GET: &str = "attrGet";
/// Setter that skips unchanged values and fires events for beans.
pub const ATTR_SET: &str = "attrSet";
/// Setter that assigns without comparing.
pub const SIMPLE_ATTR_SET: &str = "simpleAttrSet";
/// Field of a to-one role.
pub const ROLE_ONE_DECL: &str = "roleOneDecl";
/// Setter of a to-one role that keeps the counterpart in sync.
pub const ROLE_ONE_SET: &str = "roleOneSet";
/// Field of a to-many role.
pub const ROLE_MANY_DECL: &str = "roleManyDecl";
/// Unmodifiable view getter of a to-many role.
pub const ROLE_MANY_GET: &str = "roleManyGet";
/// Adder of a to-many role.
pub const ROLE_MANY_WITH: &str = "roleManyWith";
/// Remover of a to-many role.
pub const ROLE_MANY_WITHOUT: &str = "roleManyWithout";
/// Property-change support field.
pub const LISTENERS_DECL: &str = "listenersDecl";
/// Property-change event dispatch.
pub const FIRE_PROPERTY_CHANGE: &str = "firePropertyChange";
/// Lazy accessor of the property-change support.
pub const LISTENERS_GET: &str = "listenersGet";
/// Hand-declared method with its body.
pub const METHOD: &str = "method";
/// `toString` over all `String` attributes.
pub const TO_STRING: &str = "toString";
/// `removeYou` detaching all associations.
pub const REMOVE_YOU: &str = "removeYou";
/// Table class constructor from start objects.
pub const TABLE_CONSTRUCTOR: &str = "tableConstructor";
/// Table column expansion over an attribute.
pub const TABLE_EXPAND_ATTRIBUTE: &str = "tableExpandAttribute";
/// Table column expansion over a role.
pub const TABLE_EXPAND_ROLE: &str = "tableExpandRole";
/// Table row filter keeping rows whose objects are linked.
pub const TABLE_HAS_ROLE: &str = "tableHasRole";
/// Table projection of the current column into a set.
pub const TABLE_TO_SET: &str = "tableToSet";
/// Table rendering as text rows.
pub const TABLE_TO_STRING: &str = "tableToString";

/// All built-in templates by name.
pub const BUILTIN: &[(&str, &str)] = &[
    (PACKAGE, "package {{packageName}};"),
    (IMPORT, "import {{qualifiedName}};"),
    (
        CLASS_DECL,
        "public class {{name}}{{#if superClass}} extends {{superClass}}{{/if}}\n{",
    ),
    (CLASS_END, "}"),
    (
        ATTR_DECL,
        r#"   public static final String PROPERTY_{{name}} = "{{name}}";

   private {{type}} {{name}}{{#if init}} = {{init}}{{/if}};"#,
    ),
    (
        ATTR_GET,
        r"   public {{type}} get{{capName}}()
   {
      return this.{{name}};
   }",
    ),
    (
        ATTR_SET,
        r"   public {{className}} set{{capName}}({{type}} value)
   {
      if (Objects.equals(value, this.{{name}}))
      {
         return this;
      }

      final {{type}} oldValue = this.{{name}};
      this.{{name}} = value;
{{#if bean}}      this.firePropertyChange(PROPERTY_{{name}}, oldValue, value);
{{/if}}      return this;
   }",
    ),
    (
        SIMPLE_ATTR_SET,
        r"   public {{className}} set{{capName}}({{type}} value)
   {
      this.{{name}} = value;
      return this;
   }",
    ),
    (
        ROLE_ONE_DECL,
        r#"   public static final String PROPERTY_{{name}} = "{{name}}";

   private {{otherClass}} {{name}};"#,
    ),
    (
        ROLE_ONE_SET,
        r"   public {{className}} set{{capName}}({{otherClass}} value)
   {
      if (this.{{name}} == value)
      {
         return this;
      }

      final {{otherClass}} oldValue = this.{{name}};
      if (this.{{name}} != null)
      {
         this.{{name}} = null;
{{#if otherNamed}}{{#if otherMany}}         oldValue.without{{otherCapName}}(this);
{{else}}         oldValue.set{{otherCapName}}(null);
{{/if}}{{/if}}      }
      this.{{name}} = value;
      if (value != null)
      {
{{#if otherNamed}}{{#if otherMany}}         value.with{{otherCapName}}(this);
{{else}}         value.set{{otherCapName}}(this);
{{/if}}{{/if}}      }
{{#if bean}}      this.firePropertyChange(PROPERTY_{{name}}, oldValue, value);
{{/if}}      return this;
   }",
    ),
    (
        ROLE_MANY_DECL,
        r#"   public static final String PROPERTY_{{name}} = "{{name}}";

   private List<{{otherClass}}> {{name}};"#,
    ),
    (
        ROLE_MANY_GET,
        r"   public List<{{otherClass}}> get{{capName}}()
   {
      return this.{{name}} != null ? Collections.unmodifiableList(this.{{name}}) : Collections.emptyList();
   }",
    ),
    (
        ROLE_MANY_WITH,
        r"   public {{className}} with{{capName}}({{otherClass}}... value)
   {
      if (this.{{name}} == null)
      {
         this.{{name}} = new {{roleType}}<>();
      }
      for (final {{otherClass}} item : value)
      {
         if (!this.{{name}}.contains(item))
         {
            this.{{name}}.add(item);
{{#if otherNamed}}{{#if otherMany}}            item.with{{otherCapName}}(this);
{{else}}            item.set{{otherCapName}}(this);
{{/if}}{{/if}}{{#if bean}}            this.firePropertyChange(PROPERTY_{{name}}, null, item);
{{/if}}         }
      }
      return this;
   }",
    ),
    (
        ROLE_MANY_WITHOUT,
        r"   public {{className}} without{{capName}}({{otherClass}}... value)
   {
      if (this.{{name}} == null)
      {
         return this;
      }
      for (final {{otherClass}} item : value)
      {
         if (this.{{name}}.remove(item))
         {
{{#if otherNamed}}{{#if otherMany}}            item.without{{otherCapName}}(this);
{{else}}            item.set{{otherCapName}}(null);
{{/if}}{{/if}}{{#if bean}}            this.firePropertyChange(PROPERTY_{{name}}, item, null);
{{/if}}         }
      }
      return this;
   }",
    ),
    (LISTENERS_DECL, "   protected PropertyChangeSupport listeners;"),
    (
        FIRE_PROPERTY_CHANGE,
        r"   public boolean firePropertyChange(String propertyName, Object oldValue, Object newValue)
   {
      if (this.listeners != null)
      {
         this.listeners.firePropertyChange(propertyName, oldValue, newValue);
         return true;
      }
      return false;
   }",
    ),
    (
        LISTENERS_GET,
        r"   public PropertyChangeSupport listeners()
   {
      if (this.listeners == null)
      {
         this.listeners = new PropertyChangeSupport(this);
      }
      return this.listeners;
   }",
    ),
    (
        METHOD,
        r"   {{declaration}}
   {
      {{body}}
   }",
    ),
    (
        TO_STRING,
        r"   @Override
   public String toString()
   {
      final StringBuilder result = new StringBuilder();
{{#each names}}      result.append(' ').append(this.get{{this}}());
{{/each}}      return result.substring(1);
   }",
    ),
    (
        REMOVE_YOU,
        r"   public void removeYou()
   {
{{#each roles}}{{#if many}}      this.without{{capName}}(this.get{{capName}}().toArray(new {{otherClass}}[0]));
{{else}}      this.set{{capName}}(null);
{{/if}}{{/each}}   }",
    ),
    (
        TABLE_CONSTRUCTOR,
        r#"   public {{className}}Table({{className}}... start)
   {
      this.setColumnName("A");
      this.columnMap.put("A", 0);
      for (final {{className}} current : start)
      {
         final ArrayList<Object> row = new ArrayList<>();
         row.add(current);
         this.table.add(row);
      }
   }"#,
    ),
    (
        TABLE_EXPAND_ATTRIBUTE,
        r#"   public {{className}}Table expand{{capName}}(String... rowName)
   {
      final String newColumnName = rowName.length > 0 ? rowName[0] : "" + (char) ('A' + this.columnMap.size());
      final int column = this.columnMap.get(this.columnName);
      this.columnMap.put(newColumnName, this.columnMap.size());
      for (final ArrayList<Object> row : this.table)
      {
         final {{className}} start = ({{className}}) row.get(column);
         row.add(start.get{{capName}}());
      }
      return this;
   }"#,
    ),
    (
        TABLE_EXPAND_ROLE,
        r#"   public {{otherClass}}Table expand{{capName}}(String... rowName)
   {
      final String newColumnName = rowName.length > 0 ? rowName[0] : "" + (char) ('A' + this.columnMap.size());
      final {{otherClass}}Table result = new {{otherClass}}Table();
      result.setColumnMap(this.columnMap);
      result.setColumnName(newColumnName);
      result.setTable(this.table);
      final int column = this.columnMap.get(this.columnName);
      this.columnMap.put(newColumnName, this.columnMap.size());
      final ArrayList<ArrayList<Object>> oldTable = new ArrayList<>(this.table);
      this.table.clear();
      for (final ArrayList<Object> row : oldTable)
      {
         final {{className}} start = ({{className}}) row.get(column);
{{#if many}}         for (final {{otherClass}} current : start.get{{capName}}())
         {
            final ArrayList<Object> newRow = new ArrayList<>(row);
            newRow.add(current);
            this.table.add(newRow);
         }
{{else}}         if (start.get{{capName}}() != null)
         {
            final ArrayList<Object> newRow = new ArrayList<>(row);
            newRow.add(start.get{{capName}}());
            this.table.add(newRow);
         }
{{/if}}      }
      return result;
   }"#,
    ),
    (
        TABLE_HAS_ROLE,
        r"   public {{className}}Table has{{capName}}({{otherClass}}Table rowName)
   {
      final int column = this.columnMap.get(this.columnName);
      final int otherColumn = this.columnMap.get(rowName.getColumnName());
      this.table.removeIf(row -> {
         final {{className}} start = ({{className}}) row.get(column);
         final Object other = row.get(otherColumn);
{{#if many}}         return !start.get{{capName}}().contains(other);
{{else}}         return start.get{{capName}}() != other;
{{/if}}      });
      return this;
   }",
    ),
    (
        TABLE_TO_SET,
        r"   public LinkedHashSet<{{className}}> toSet()
   {
      final LinkedHashSet<{{className}}> result = new LinkedHashSet<>();
      final int column = this.columnMap.get(this.columnName);
      for (final ArrayList<Object> row : this.table)
      {
         result.add(({{className}}) row.get(column));
      }
      return result;
   }",
    ),
    (
        TABLE_TO_STRING,
        r#"   @Override
   public String toString()
   {
      final StringBuilder buf = new StringBuilder();
      for (final String key : this.columnMap.keySet())
      {
         buf.append(key).append(" \t");
      }
      buf.append("\n");
      for (final ArrayList<Object> row : this.table)
      {
         for (final Object cell : row)
         {
            buf.append(cell).append(" \t");
         }
         buf.append("\n");
      }
      buf.append("\n");
      return buf.toString();
   }"#,
    ),
];
