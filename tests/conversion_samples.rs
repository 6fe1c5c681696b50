//! End-to-end conversion of the sample templates

use jsp2rest::jsp::testing::{assert_java, JspSources};
use jsp2rest::jsp::{ConvertError, Driver, DriverOptions};

const WITHOUT_SOURCE: DriverOptions = DriverOptions {
    embed_source: false,
    named_component: false,
};

fn convert_sample(name: &str, package: &str, options: DriverOptions) -> String {
    let source = JspSources::get_string(name).expect("sample to load");
    let source_path = format!("docs/samples/{}", name);
    Driver::new(source.as_bytes(), source_path, package, name)
        .expect("route to be usable")
        .with_options(options)
        .run()
        .expect("sample to convert")
        .to_code()
}

#[test]
fn test_minimal_sample_full_text() {
    let code = convert_sample("minimal.jsp", "", DriverOptions::default());

    let expected = "/*\n * This class was automatically generated when transforming PPI to a JEE app\n * on November 2013.\n * \n * The code of the generator can be found at:\n * https://github.com/ivanator/jsp-parser\n * \n * Class derived from this source JSP:\n * docs/samples/minimal.jsp\n */\nimport java.io.StringWriter;\nimport java.io.PrintWriter;\nimport java.io.Writer;\nimport javax.ejb.Stateless;\nimport javax.servlet.http.HttpServletRequest;\nimport javax.servlet.http.HttpServletResponse;\nimport javax.servlet.http.HttpSession;\nimport javax.servlet.jsp.PageContext;\nimport javax.ws.rs.GET;\nimport javax.ws.rs.POST;\nimport javax.ws.rs.Path;\nimport javax.ws.rs.Produces;\nimport javax.ws.rs.core.Context;\n@Stateless\n@Path(\"/minimal.jsp\")\npublic class minimal {\n\t@GET @POST\n\t@Produces(\"application/json; charset=UTF-8\")\n\tpublic String doRun(\n\t\t\t@Context HttpServletRequest request,\n\t\t\t@Context HttpServletResponse response) throws Exception {\n\t\tHttpSession session = request.getSession(false);\n\t\tWriter stringOut = new StringWriter();\n\t\tPrintWriter out = new PrintWriter(stringOut);\n\t\tout.print(\"<p>Hello</p>\\n\");\n\t\treturn stringOut.toString();\n\t}\n}\n/*\nOriginal JSP code as follows\n(block comments replaced by: \"START-COMMENT\" and \"END-COMMENT\"):\n---- ---- ----\n<p>Hello</p>\n\n---- ---- ----\n*/";

    assert_eq!(code, expected);
}

#[test]
fn test_mixed_sample() {
    let code = convert_sample("mixed.jsp", "com.acme.rest", WITHOUT_SOURCE);

    assert_java(&code)
        .package("com.acme.rest")
        .class_name("mixed")
        .route("/mixed.jsp")
        .markup_writes(5)
        .occurrences("return stringOut.toString();", 2)
        .not_contains("return;")
        .not_contains("pageContext")
        .not_contains("PageContextFactory")
        .in_order(&[
            "import javax.ws.rs.core.Context;\nimport java.util.List;\nimport com.acme.User;\n",
            "/*\nLists the users of the current account\n*/\n@Stateless\n@Path(\"/mixed.jsp\")\n",
            "\t\tPrintWriter out = new PrintWriter(stringOut);\n",
            "\t\tout.print(\"\\n\\n\\n<html>\\n<body>\\n\");\n",
            "(List<User>) request.getAttribute(\"users\");",
            "\t\treturn stringOut.toString();\n\t}\n\tfor (User user : users) {\n\n",
            "\t\tout.print(\"\\n\\t<li>\");\n\t\tout.print(user.getName());\n\t\tout.print(\"</li>\\n\");\n",
            "\t\tout.print(\"\\n\");\n/*\nend of list\n*/\n\t\tout.print(\"\\n</body>\\n</html>\\n\");\n",
            "\t\treturn stringOut.toString();\n\t}\n",
            "private String label(HttpServletResponse response) {\n\t\treturn \"users\";\n\t}\n}",
        ]);
}

#[test]
fn test_mixed_sample_echoes_source() {
    let code = convert_sample("mixed.jsp", "com.acme.rest", DriverOptions::default());

    assert_java(&code)
        .in_order(&["\n}\n/*\nOriginal JSP code as follows\n", "---- ---- ----\n*/"])
        .contains("\n<%-- Lists the users of the current account --%>\n")
        .contains("\t\treturn;\n");
}

#[test]
fn test_bundles_sample() {
    let code = convert_sample("bundles.jsp", "com.acme.rest", WITHOUT_SOURCE);

    assert_java(&code)
        .markup_writes(2)
        .occurrences("import java.util.ResourceBundle;\n", 1)
        .in_order(&[
            "import javax.ws.rs.core.Context;\nimport java.util.ResourceBundle;\n@Stateless\n",
            "\t\tPrintWriter out = new PrintWriter(stringOut);\n\
             \t\tResourceBundle bundle = ResourceBundle.getBundle(\"com.acme.messages\");\n\
             \t\tString title = bundle.getString(\"page.title\");\n\
             \t\tString footer = bundle.getString(\"page.footer\");\n\
             \t\trequest.setAttribute(\"footer\", footer);\n\
             \t\tout.print(\"\\n\\n\\n\\n<h1>\");\n\
             \t\tout.print(title);\n\
             \t\tout.print(\"</h1>\\n\");\n\
             \t\treturn stringOut.toString();\n",
        ]);
}

#[test]
fn test_broken_sample_reports_both_problems() {
    let error = JspSources::convert("broken.jsp", "com.acme.rest").unwrap_err();

    let problems: Vec<_> = error
        .problems()
        .iter()
        .map(|p| (p.line, p.column, p.message.as_str()))
        .collect();
    assert_eq!(
        problems,
        vec![
            (2, 0, "unknown directive 'bogus'"),
            (3, 0, "missing required attribute 'var' on <fmt:message>"),
        ]
    );
    assert!(matches!(error, ConvertError::Parse { .. }));
}

#[test]
fn test_file_backed_conversion() {
    let document = JspSources::convert("bundles.jsp", "com.acme.rest").unwrap();

    assert_eq!(document.class_name(), "bundles");
    assert!(document.source_path().ends_with("docs/samples/bundles.jsp"));
    assert_java(&document.to_code()).contains("<fmt:setBundle basename=\"com.acme.messages\"/>");
}

#[test]
fn test_equal_documents_render_equally() {
    let first = JspSources::convert("mixed.jsp", "p").unwrap();
    let second = JspSources::convert("mixed.jsp", "p").unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_code(), second.to_code());
}
