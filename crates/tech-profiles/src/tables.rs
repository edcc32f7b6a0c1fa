use crate::profile::TechProfile;

/// Query-expansion keywords appended when the command targets a known
/// technology. The mapping is part of the retrieval contract; changing it
/// changes which chunks surface for a given command.
pub const KEYWORD_EXPANSIONS: &[(&str, &[&str])] = &[
    ("prisma", &["orm", "database", "schema"]),
    ("react", &["component", "jsx", "hooks"]),
    ("vue", &["component", "template"]),
    ("angular", &["component", "service"]),
    ("express", &["api", "server", "route"]),
    ("mongodb", &["collection", "document"]),
    ("postgresql", &["sql", "table"]),
    ("typescript", &["type", "interface"]),
    ("jest", &["test", "testing", "spec"]),
    ("webpack", &["bundle", "build"]),
    ("docker", &["container", "image"]),
    ("aws", &["cloud", "lambda"]),
    ("firebase", &["firestore", "auth"]),
];

/// Migration vocabulary recognized inside commands during query expansion
pub const MIGRATION_LEXICON: &[&str] = &[
    "migrate",
    "convert",
    "transform",
    "refactor",
    "update",
    "upgrade",
    "database",
    "api",
    "framework",
    "library",
    "dependency",
    "import",
    "export",
    "function",
    "class",
    "component",
    "service",
    "model",
];

pub(crate) const PROFILES: &[TechProfile] = &[
    TechProfile {
        tag: "prisma",
        context: "Prisma is a type-safe ORM for Node.js and TypeScript. Database access goes \
                  through a generated PrismaClient; the data model lives in schema.prisma and \
                  queries are promise-based methods like findMany, create and update.",
        patterns: &[
            "Replace raw SQL and query-builder calls with PrismaClient model methods",
            "Move table definitions into schema.prisma models",
            "Use prisma.$transaction for multi-statement writes",
            "Let generated types replace hand-written row interfaces",
        ],
        required_imports: &["@prisma/client"],
        pattern_markers: &["prisma.", "PrismaClient"],
    },
    TechProfile {
        tag: "react",
        context: "React builds interfaces from function components and hooks. State lives in \
                  useState/useReducer, side effects in useEffect, and markup is returned as JSX.",
        patterns: &[
            "Convert class components to function components",
            "Move lifecycle logic into useEffect hooks",
            "Replace manual DOM updates with state-driven rendering",
            "Lift shared state into props or context",
        ],
        required_imports: &["react"],
        pattern_markers: &["useState", "useEffect", "jsx"],
    },
    TechProfile {
        tag: "vue",
        context: "Vue organizes interfaces into single-file components with template, script \
                  and style blocks; reactivity comes from refs and computed properties.",
        patterns: &[
            "Convert markup into component templates",
            "Expose state through refs and computed properties",
            "Wire events with v-on and bindings with v-bind",
        ],
        required_imports: &["vue"],
        pattern_markers: &["ref(", "computed(", "template"],
    },
    TechProfile {
        tag: "angular",
        context: "Angular applications are built from components and injectable services, with \
                  dependency injection wiring them together through modules.",
        patterns: &[
            "Wrap view logic in @Component classes",
            "Move shared logic into @Injectable services",
            "Use constructor injection instead of manual instantiation",
        ],
        required_imports: &["@angular/core"],
        pattern_markers: &["@Component", "@Injectable"],
    },
    TechProfile {
        tag: "express",
        context: "Express is a minimal Node.js web framework. Routes are registered on an app \
                  or Router instance, and cross-cutting behavior is middleware with the \
                  (req, res, next) signature.",
        patterns: &[
            "Register endpoints on express.Router instances",
            "Convert handler logic to (req, res, next) middleware",
            "Centralize error handling in a terminal middleware",
        ],
        required_imports: &["express"],
        pattern_markers: &["router", "app.", "req", "res"],
    },
    TechProfile {
        tag: "mongodb",
        context: "MongoDB stores JSON-like documents in collections. Access goes through a \
                  MongoClient; queries are filter documents passed to collection methods like \
                  find, insertOne and updateOne.",
        patterns: &[
            "Replace table rows with documents in collections",
            "Convert SQL predicates to filter documents",
            "Use aggregation pipelines for joins and grouping",
        ],
        required_imports: &["mongodb"],
        pattern_markers: &["collection", "db."],
    },
    TechProfile {
        tag: "postgresql",
        context: "PostgreSQL is a relational database accessed over SQL; in Node.js the pg \
                  driver provides pooled clients and parameterized queries.",
        patterns: &[
            "Use parameterized queries through a connection pool",
            "Keep schema changes in ordered migration files",
        ],
        required_imports: &["pg"],
        pattern_markers: &["query(", "pool"],
    },
    TechProfile {
        tag: "typescript",
        context: "TypeScript adds static types on top of JavaScript. Public surfaces carry \
                  explicit annotations, shared shapes become interfaces or type aliases, and \
                  the compiler enforces them at build time.",
        patterns: &[
            "Annotate function signatures and exported values",
            "Describe object shapes as interfaces or type aliases",
            "Replace runtime shape checks with compile-time types",
        ],
        required_imports: &[],
        pattern_markers: &[": ", "interface", "type "],
    },
    TechProfile {
        tag: "jest",
        context: "Jest is a batteries-included JavaScript test runner: suites are describe \
                  blocks, cases are it/test callbacks, and assertions use the expect API with \
                  built-in mocking.",
        patterns: &[
            "Group related cases in describe blocks",
            "Assert through expect matchers",
            "Replace hand-rolled stubs with jest.fn and jest.mock",
        ],
        required_imports: &["@jest/globals"],
        pattern_markers: &["describe(", "it(", "test(", "expect("],
    },
];

/// Fallback profile for technology tags outside the table
pub(crate) const GENERIC_PROFILE: TechProfile = TechProfile {
    tag: "generic",
    context: "Apply the idioms of the target technology while keeping the code's observable \
              behavior unchanged.",
    patterns: &[
        "Preserve the public surface of each migrated fragment",
        "Adopt the target technology's standard project conventions",
    ],
    required_imports: &[],
    pattern_markers: &[],
};

/// Pattern bullets emitted into the plan prompt when the command mentions the
/// matching concern.
pub(crate) const COMMAND_PATTERNS: &[(&str, &[&str])] = &[
    (
        "database",
        &[
            "Identify every query, connection and schema definition in scope",
            "Map existing tables or collections onto the target data model",
            "Migrate reads before writes so both stacks can run side by side",
        ],
    ),
    (
        "api",
        &[
            "Inventory existing endpoints, verbs and payload shapes",
            "Keep routes stable while swapping the handler implementation",
            "Preserve error status codes and response contracts",
        ],
    ),
    (
        "component",
        &[
            "Migrate leaf components before their containers",
            "Keep props and emitted events identical across the rewrite",
            "Move shared state handling to the target framework's idiom",
        ],
    ),
    (
        "test",
        &[
            "Port test setup and teardown helpers first",
            "Translate assertions to the target framework's matchers",
            "Keep test names and coverage scope unchanged",
        ],
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_table_is_exact() {
        assert_eq!(KEYWORD_EXPANSIONS.len(), 13);
        let prisma = KEYWORD_EXPANSIONS
            .iter()
            .find(|(tag, _)| *tag == "prisma")
            .unwrap();
        assert_eq!(prisma.1, &["orm", "database", "schema"]);
        let aws = KEYWORD_EXPANSIONS
            .iter()
            .find(|(tag, _)| *tag == "aws")
            .unwrap();
        assert_eq!(aws.1, &["cloud", "lambda"]);
    }

    #[test]
    fn lexicon_covers_core_verbs() {
        for word in ["migrate", "convert", "refactor", "database", "component"] {
            assert!(MIGRATION_LEXICON.contains(&word), "missing {word}");
        }
    }

    #[test]
    fn every_profile_has_context_and_patterns() {
        for profile in PROFILES {
            assert!(!profile.context.is_empty(), "{} lacks context", profile.tag);
            assert!(!profile.patterns.is_empty(), "{} lacks patterns", profile.tag);
        }
    }
}
