pub fn render_schema() -> String {
	expand_includes(include_str!("../../../sql/init.sql"))
}

fn expand_includes(sql: &str) -> String {
	let mut out = String::new();

	for line in sql.lines() {
		let trimmed = line.trim();

		if let Some(path) = trimmed.strip_prefix("\\ir ") {
			match path.trim() {
				"tables/001_users.sql" =>
					out.push_str(include_str!("../../../sql/tables/001_users.sql")),
				"tables/002_hashtags.sql" =>
					out.push_str(include_str!("../../../sql/tables/002_hashtags.sql")),
				"tables/003_coordis.sql" =>
					out.push_str(include_str!("../../../sql/tables/003_coordis.sql")),
				"tables/004_coordi_hashtags.sql" =>
					out.push_str(include_str!("../../../sql/tables/004_coordi_hashtags.sql")),
				"tables/005_coordi_images.sql" =>
					out.push_str(include_str!("../../../sql/tables/005_coordi_images.sql")),
				"tables/006_user_hashtag_preferences.sql" => out
					.push_str(include_str!("../../../sql/tables/006_user_hashtag_preferences.sql")),
				"tables/007_user_coordi_interactions.sql" => out
					.push_str(include_str!("../../../sql/tables/007_user_coordi_interactions.sql")),
				"tables/008_user_coordi_view_logs.sql" => out
					.push_str(include_str!("../../../sql/tables/008_user_coordi_view_logs.sql")),
				_ => out.push_str(line),
			}
		} else {
			out.push_str(line);
		}

		out.push('\n');
	}

	out
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn expands_every_table_include() {
		let sql = render_schema();

		assert!(!sql.contains("\\ir "), "Unexpanded include left in schema.");

		for table in [
			"users",
			"hashtags",
			"coordis",
			"coordi_hashtags",
			"coordi_images",
			"user_hashtag_preferences",
			"user_coordi_interactions",
			"user_coordi_view_logs",
		] {
			assert!(
				sql.contains(&format!("CREATE TABLE IF NOT EXISTS {table} (")),
				"Missing table {table}."
			);
		}
	}
}
