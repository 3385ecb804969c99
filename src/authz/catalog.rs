//! Built-in permission catalog for the fleet administration console

/// `(module key, module name, [(code, label)])`, in declaration order
pub(super) type CatalogTable = &'static [(&'static str, &'static str, &'static [(&'static str, &'static str)])];

pub(super) const FLEET_CATALOG: CatalogTable = &[
    (
        "dashboard",
        "Dashboard",
        &[("dashboard.view", "View dashboard")],
    ),
    (
        "user",
        "Users",
        &[
            ("user.view", "View users"),
            ("user.create", "Create users"),
            ("user.edit", "Edit users"),
            ("user.delete", "Delete users"),
        ],
    ),
    (
        "role",
        "Roles",
        &[
            ("role.view", "View roles"),
            ("role.create", "Create roles"),
            ("role.edit", "Edit roles"),
            ("role.delete", "Delete roles"),
        ],
    ),
    (
        "inventory",
        "Inventory",
        &[
            ("inventory.view", "View inventory"),
            ("inventory.create", "Register stock entries"),
            ("inventory.edit", "Adjust stock levels"),
            ("inventory.delete", "Remove stock entries"),
        ],
    ),
    (
        "tire",
        "Tires",
        &[
            ("tire.view", "View tires"),
            ("tire.create", "Register tires"),
            ("tire.edit", "Edit tire records"),
            ("tire.delete", "Retire tires"),
            ("tire.approve", "Approve tire transfers"),
        ],
    ),
    (
        "vehicle",
        "Vehicles",
        &[
            ("vehicle.view", "View vehicles"),
            ("vehicle.create", "Register vehicles"),
            ("vehicle.edit", "Edit vehicles"),
            ("vehicle.delete", "Decommission vehicles"),
        ],
    ),
    (
        "report",
        "Reports",
        &[
            ("report.view", "View reports"),
            ("report.export", "Export reports"),
        ],
    ),
];
