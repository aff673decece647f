/// One DDL statement of the provisioning run, named for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvisionStep {
    pub object: &'static str,
    pub sql: &'static str,
}

/// Executed in order on every startup. The table is only created when
/// missing; the function is replaced; the trigger is dropped and recreated so
/// exactly one current definition exists.
pub const PROVISION_STEPS: &[ProvisionStep] = &[
    ProvisionStep {
        object: "table mensaxes",
        sql: "CREATE TABLE IF NOT EXISTS mensaxes (
            id SERIAL PRIMARY KEY,
            usuario TEXT NOT NULL,
            mensaxe TEXT NOT NULL
        )",
    },
    ProvisionStep {
        object: "function notificar_mensaxe",
        sql: "CREATE OR REPLACE FUNCTION notificar_mensaxe() RETURNS trigger AS $$
        BEGIN
            PERFORM pg_notify('novamensaxe', NEW.id::text);
            RETURN NEW;
        END;
        $$ LANGUAGE plpgsql",
    },
    ProvisionStep {
        object: "previous trigger not_nova_mensaxe",
        sql: "DROP TRIGGER IF EXISTS not_nova_mensaxe ON mensaxes",
    },
    ProvisionStep {
        object: "trigger not_nova_mensaxe",
        sql: "CREATE TRIGGER not_nova_mensaxe
            AFTER INSERT ON mensaxes
            FOR EACH ROW
            EXECUTE PROCEDURE notificar_mensaxe()",
    },
];
