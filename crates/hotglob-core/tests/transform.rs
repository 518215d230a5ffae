//! End-to-end transform tests over an in-memory project tree.

use hotglob_core::{
    transform_unit, ErrorCode, NullResolver, ResolveOptions, SpecifierResolver, TransformContext,
    TransformResult,
};
use hotglob_glob::MemoryFs;

fn project_fs() -> MemoryFs {
    let mut fs = MemoryFs::new();
    fs.add_file("/proj/src/app.ts");
    fs.add_file("/proj/src/util.ts");
    fs.add_file("/proj/src/pages/a.ts");
    fs.add_file("/proj/src/pages/b.ts");
    fs.add_file("/proj/src/pages/a.test.ts");
    fs.add_file("/proj/widgets/w1.ts");
    fs.add_file("/proj/widgets/w2.ts");
    fs.add_file("/proj/node_modules/dep/index.ts");
    fs
}

async fn run(code: &str, id: &str, fs: &MemoryFs) -> TransformResult {
    let ctx = TransformContext {
        root: "/proj".to_string(),
        resolver: &NullResolver,
        fs,
        want_map: false,
    };
    transform_unit(code, id, &ctx).await
}

fn rewritten(result: &TransformResult) -> &str {
    &result
        .output
        .as_ref()
        .expect("expected a rewritten unit")
        .code
}

#[tokio::test]
async fn no_call_sites_is_a_no_op() {
    let fs = project_fs();
    let code = "export const x = 1;\nconsole.log(x);\n";
    let result = run(code, "/proj/src/app.ts", &fs).await;
    assert!(result.output.is_none());
    assert!(result.diagnostics.is_empty());
}

#[tokio::test]
async fn pattern_inside_literals_is_ignored() {
    let fs = project_fs();
    let code = r#"const s = "import.meta.hot.accept({ glob: './x' })";
// import.meta.hot.accept({ glob: './y' })
"#;
    let result = run(code, "/proj/src/app.ts", &fs).await;
    assert!(result.output.is_none());
}

#[tokio::test]
async fn relative_glob_with_negation() {
    let fs = project_fs();
    let code =
        r#"import.meta.hot.accept({ glob: ["./pages/*.ts", "!./pages/*.test.ts"] });"#;
    let result = run(code, "/proj/src/app.ts", &fs).await;
    assert!(result.diagnostics.is_empty());
    assert_eq!(
        rewritten(&result),
        r#"import.meta.hot.accept(["./pages/a.ts", "./pages/b.ts"]);"#
    );
}

#[tokio::test]
async fn root_style_glob() {
    let fs = project_fs();
    let code = r#"import.meta.hot.accept({ glob: "/widgets/*.ts" });"#;
    let result = run(code, "/proj/src/app.ts", &fs).await;
    assert_eq!(
        rewritten(&result),
        r#"import.meta.hot.accept(["/widgets/w1.ts", "/widgets/w2.ts"]);"#
    );
}

#[tokio::test]
async fn importer_never_matches_itself() {
    let fs = project_fs();
    let code = r#"import.meta.hot.accept({ glob: "./*.ts" });"#;
    let result = run(code, "/proj/src/app.ts", &fs).await;
    assert_eq!(
        rewritten(&result),
        r#"import.meta.hot.accept(["./util.ts"]);"#
    );
}

#[tokio::test]
async fn dependency_directories_never_match() {
    let fs = project_fs();
    let code = r#"import.meta.hot.accept({ glob: "/**/*.ts" });"#;
    let result = run(code, "/proj/src/app.ts", &fs).await;
    let out = rewritten(&result);
    assert!(out.contains("/widgets/w1.ts"));
    assert!(!out.contains("node_modules"));
    assert!(!out.contains("dep/index.ts"));
}

#[tokio::test]
async fn plain_callback_becomes_record_adapter() {
    let fs = project_fs();
    let code = r#"import.meta.hot.accept({ glob: "./pages/*.ts", }, (m) => { render(m); });"#;
    let result = run(code, "/proj/src/app.ts", &fs).await;
    let out = rewritten(&result);

    assert!(out.contains(r#"(["./pages/a.test.ts", "./pages/a.ts", "./pages/b.ts"], "#));
    assert!(out.contains("function (m) {\nconst cb = ((m) => { render(m); });\n"));
    assert!(out.contains(
        r#"const mn = {"./pages/a.test.ts": m[0], "./pages/a.ts": m[1], "./pages/b.ts": m[2], };"#
    ));
    assert!(out.contains("cb?.call(this, mn);\n});"));
}

#[tokio::test]
async fn spread_callback_takes_first_element() {
    let fs = project_fs();
    let code = r#"import.meta.hot.accept({ glob: "./pages/a.ts" }, ...[onUpdate, extra]);"#;
    let result = run(code, "/proj/src/app.ts", &fs).await;
    let out = rewritten(&result);
    assert!(out.contains("const [cb] = [onUpdate, extra];"));
    assert!(out.contains(r#""./pages/a.ts": m[0]"#));
    assert!(!out.contains("...["));
}

#[tokio::test]
async fn surrounding_code_survives_untouched() {
    let fs = project_fs();
    let code = "// header comment\nlet before = 1;\nimport.meta.hot.accept({ glob: \"./pages/a.ts\" });\nlet after = 2;\n";
    let result = run(code, "/proj/src/app.ts", &fs).await;
    let out = rewritten(&result);
    assert!(out.starts_with("// header comment\nlet before = 1;\n"));
    assert!(out.ends_with("\nlet after = 2;\n"));
}

#[tokio::test]
async fn malformed_site_leaves_siblings_intact() {
    let fs = project_fs();
    let good = r#"import.meta.hot.accept({ glob: "./pages/a.ts" });"#;
    let code = format!("{good}\nimport.meta.hot.accept({{ glob: \"./pages/b.ts\" ");
    let result = run(&code, "/proj/src/app.ts", &fs).await;

    let out = rewritten(&result);
    assert!(out.contains(r#"import.meta.hot.accept(["./pages/a.ts"]);"#));

    assert_eq!(result.diagnostics.len(), 1);
    let diag = &result.diagnostics[0];
    assert_eq!(diag.code, ErrorCode::MalformedCall);
    assert_eq!(diag.span.start, good.len() + 1);
}

#[tokio::test]
async fn lookalike_overloads_are_skipped_silently() {
    let fs = project_fs();
    let code = r#"import.meta.hot.accept("./dep.ts", () => {});"#;
    let result = run(code, "/proj/src/app.ts", &fs).await;
    assert!(result.output.is_none());
    assert!(result.diagnostics.is_empty());
}

#[tokio::test]
async fn invalid_glob_value_is_a_hard_error() {
    let fs = project_fs();
    let code = "import.meta.hot.accept({ glob: 42 });";
    let result = run(code, "/proj/src/app.ts", &fs).await;
    assert!(result.output.is_none());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, ErrorCode::InvalidGlobValue);
}

#[tokio::test]
async fn virtual_module_root_glob_works() {
    let fs = project_fs();
    let code = r#"import.meta.hot.accept({ glob: "/widgets/*.ts" });"#;
    let result = run(code, "virtual:widgets", &fs).await;
    assert_eq!(
        rewritten(&result),
        r#"import.meta.hot.accept(["/widgets/w1.ts", "/widgets/w2.ts"]);"#
    );
}

#[tokio::test]
async fn virtual_module_relative_glob_fails() {
    let fs = project_fs();
    let code = r#"import.meta.hot.accept({ glob: "./widgets/*.ts" });"#;
    let result = run(code, "virtual:widgets", &fs).await;
    assert!(result.output.is_none());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].code,
        ErrorCode::VirtualModuleRelativeGlob
    );
}

#[tokio::test]
async fn unresolvable_bare_specifier_fails() {
    let fs = project_fs();
    let code = r#"import.meta.hot.accept({ glob: "some-pkg/dist/*.ts" });"#;
    let result = run(code, "/proj/src/app.ts", &fs).await;
    assert!(result.output.is_none());
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].code, ErrorCode::UnresolvableGlob);
    assert!(result.diagnostics[0].message.contains("some-pkg/dist/*.ts"));
}

#[tokio::test]
async fn bare_specifier_resolves_through_resolver() {
    struct DepResolver;

    #[async_trait::async_trait]
    impl SpecifierResolver for DepResolver {
        async fn resolve(
            &self,
            specifier: &str,
            _importer: Option<&str>,
            _opts: &ResolveOptions,
        ) -> Option<String> {
            specifier
                .strip_prefix("widgets-pkg/")
                .map(|rest| format!("/proj/widgets/{rest}"))
        }
    }

    let fs = project_fs();
    let code = r#"import.meta.hot.accept({ glob: "widgets-pkg/*.ts" });"#;
    let ctx = TransformContext {
        root: "/proj".to_string(),
        resolver: &DepResolver,
        fs: &fs,
        want_map: false,
    };
    let result = transform_unit(code, "/proj/src/app.ts", &ctx).await;
    assert_eq!(
        rewritten(&result),
        r#"import.meta.hot.accept(["/widgets/w1.ts", "/widgets/w2.ts"]);"#
    );
}

#[tokio::test]
async fn multiple_sites_rewrite_independently() {
    let fs = project_fs();
    let code = "import.meta.hot.accept({ glob: \"./pages/a.ts\" });\nimport.meta.hot.accept({ glob: \"/widgets/w1.ts\" });\n";
    let result = run(code, "/proj/src/app.ts", &fs).await;
    let out = rewritten(&result);
    assert!(out.contains(r#"(["./pages/a.ts"])"#));
    assert!(out.contains(r#"(["/widgets/w1.ts"])"#));
}

#[tokio::test]
async fn offset_map_only_when_requested() {
    let fs = project_fs();
    let code = r#"import.meta.hot.accept({ glob: "./pages/a.ts" });"#;

    let ctx = TransformContext {
        root: "/proj".to_string(),
        resolver: &NullResolver,
        fs: &fs,
        want_map: true,
    };
    let with_map = transform_unit(code, "/proj/src/app.ts", &ctx).await;
    assert!(with_map.output.unwrap().map.is_some());

    let without_map = run(code, "/proj/src/app.ts", &fs).await;
    assert!(without_map.output.unwrap().map.is_none());
}

#[tokio::test]
async fn rewriting_is_stable_across_runs() {
    let fs = project_fs();
    let code = r#"import.meta.hot.accept({ glob: "./pages/*.ts" });"#;
    let first = run(code, "/proj/src/app.ts", &fs).await;
    let second = run(code, "/proj/src/app.ts", &fs).await;
    assert_eq!(rewritten(&first), rewritten(&second));
}

#[tokio::test]
async fn unlexable_unit_is_skipped_quietly() {
    let fs = project_fs();
    let code = "import.meta.hot.accept({ glob: \"./pages/a.ts\" }); const s = \"unterminated";
    let result = run(code, "/proj/src/app.ts", &fs).await;
    assert!(result.output.is_none());
    assert!(result.diagnostics.is_empty());
}
