//! Render job commands and the `cron.schedule` call that registers them.

use super::{HttpMethod, HttpRequestSpec, NameValuePair};

/// Render a `pg_net` request as a dollar-quoted job command.
///
/// GET requests carry their parameters as `params`, POST requests as `body`.
/// Pairs with an empty name or value are left out. Single quotes in the URL
/// and in pair names and values are doubled.
pub fn build_http_request_command(request: &HttpRequestSpec) -> String {
    let mut arguments = vec![
        format!("url:='{}'", escape_literal(&request.url)),
        format!("headers:=jsonb_build_object({})", render_pairs(&request.headers)),
    ];

    let parameters = render_pairs(&request.parameters);
    if !parameters.is_empty() {
        let argument = match request.method {
            HttpMethod::Get => "params",
            HttpMethod::Post => "body",
        };
        arguments.push(format!("{}:=jsonb_build_object({})", argument, parameters));
    }

    arguments.push(format!("timeout_milliseconds:={}", request.timeout_ms));

    format!(
        "$$\n    select\n      net.{}(\n          {}\n      );\n    $$",
        request.method.net_function(),
        arguments.join(",\n          ")
    )
}

pub fn build_sql_function_command(schema: &str, function_name: &str) -> String {
    format!("CALL {}.{}()", schema, function_name)
}

/// Wrap a job command in the query that schedules it. Commands that are not
/// dollar-quoted yet get quoted here.
pub fn build_cron_query(name: &str, schedule: &str, command: &str) -> String {
    let command = if command.trim_start().starts_with("$$") {
        command.to_string()
    } else {
        format!("$${}$$", command)
    };
    format!(
        "select cron.schedule('{}','{}',{});",
        escape_literal(name),
        escape_literal(schedule),
        command
    )
}

fn render_pairs(pairs: &[NameValuePair]) -> String {
    pairs
        .iter()
        .filter(|pair| !pair.name.is_empty() && !pair.value.is_empty())
        .map(|pair| format!("'{}', '{}'", escape_literal(&pair.name), escape_literal(&pair.value)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn escape_literal(value: &str) -> String {
    value.replace('\'', "''")
}
