use indoc::indoc;

/// Common SQL fixtures for testing
pub mod sql {
    use super::*;

    /// A typical migration file: schema objects only
    pub const SCHEMA_MIGRATION: &str = indoc! {r#"
        CREATE SCHEMA IF NOT EXISTS accounting;

        CREATE TABLE public.users (
            id SERIAL PRIMARY KEY,
            email TEXT UNIQUE NOT NULL
        );

        CREATE INDEX users_email_idx ON public.users (email);

        ALTER TABLE public.users ENABLE ROW LEVEL SECURITY;

        CREATE POLICY users_self ON public.users
            USING (id = current_setting('app.user_id')::int);

        CREATE OR REPLACE FUNCTION public.touch() RETURNS trigger AS $$
        BEGIN
            NEW.updated_at := now();
            RETURN NEW;
        END;
        $$ LANGUAGE plpgsql;

        COMMENT ON TABLE public.users IS 'Application users';
        GRANT SELECT ON public.users TO anon;
    "#};

    /// A seed file: data changes only
    pub const SEED_DATA: &str = indoc! {r#"
        INSERT INTO public.users (email) VALUES ('a@example.com'), ('b@example.com');
        UPDATE public.users SET email = lower(email);
        DELETE FROM public.users WHERE email LIKE '%@invalid';
        SELECT * INTO users_backup FROM public.users;
    "#};

    /// Queries only
    pub const QUERIES: &str = indoc! {r#"
        SELECT 1;
        SELECT u.id, u.email FROM public.users u WHERE u.id = 42;
        WITH recent AS (SELECT * FROM public.users) SELECT count(*) FROM recent;
    "#};

    /// All three categories interleaved
    pub const MIXED_SCRIPT: &str = indoc! {r#"
        CREATE TABLE items (id int);
        INSERT INTO items VALUES (1);
        SELECT * FROM items;
        ALTER TABLE items ADD COLUMN name text;
        SELECT count(*) FROM items;
        UPDATE items SET name = 'x';
    "#};

    /// Transaction control counts as migration
    pub const WITH_TRANSACTION: &str = indoc! {r#"
        BEGIN;
        CREATE TABLE t (id int);
        COMMIT;
    "#};

    /// Languages and text search setup are schema changes too
    pub const LANGUAGE_AND_TEXT_SEARCH: &str = indoc! {r#"
        CREATE LANGUAGE plperl;
        ALTER TEXT SEARCH DICTIONARY english_stem (StopWords = english);
        ALTER TEXT SEARCH CONFIGURATION english ALTER MAPPING FOR word WITH simple;
    "#};

    /// Table activity script with the `ENABLE RLS` shorthand
    pub const ACTIVITY_WITH_RLS_SHORTHAND: &str = indoc! {r#"
        CREATE TABLE users (id INT);
        CREATE FUNCTION test() RETURNS INT AS $$ BEGIN RETURN 1; END; $$ LANGUAGE plpgsql;
        INSERT INTO users (id) VALUES (1);
        ALTER TABLE users ENABLE RLS;
        CREATE VIEW user_view AS SELECT * FROM users;
    "#};

    /// Scheduling jobs with pg_cron
    pub const CRON_JOBS: &str = indoc! {r#"
        select cron.schedule('nightly-job', '0 3 * * *', 'CALL maintenance.vacuum_logs()');
        select cron.unschedule('old-job');
    "#};

    /// Drops of tables and functions
    pub const DROPS: &str = indoc! {r#"
        DROP TABLE accounting.invoices;
        DROP TABLE IF EXISTS audit_log CASCADE;
        DROP FUNCTION IF EXISTS reporting.monthly_totals(int, int);
    "#};
}

/// pg_cron job commands as stored in cron.job
pub mod cron {
    use super::*;

    pub const HTTP_POST: &str = indoc! {r#"
        $$
            select
              net.http_post(
                  url:='https://hooks.example.com/notify',
                  headers:=jsonb_build_object('Content-Type', 'application/json'),
                  body:=jsonb_build_object('source', 'cron'),
                  timeout_milliseconds:=3000
              );
        $$
    "#};

    pub const EDGE_FUNCTION: &str = indoc! {r#"
        $$
            select
              net.http_post(
                  url:='https://abcdefgh.supabase.co/functions/v1/send-digest',
                  headers:=jsonb_build_object('Authorization', 'Bearer service-key'),
                  timeout_milliseconds:=5000
              );
        $$
    "#};

    pub const SQL_SNIPPET: &str = indoc! {r#"
        delete from public.sessions
        where expires_at < now();
    "#};
}
