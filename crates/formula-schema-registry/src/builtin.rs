//! The built-in property table shared by every entity type.
//!
//! [`BUILTIN_PROPERTIES`] lists every attribute the formula language knows
//! about on a scripted object, in slot order. [`BuiltinSlot`] names each
//! slot so engine code can address them without a name lookup. The two must
//! agree in length; [`BaseSchemaRegistry`](crate::BaseSchemaRegistry) refuses
//! to build if they drift apart.

use num_enum::{IntoPrimitive, TryFromPrimitive};

/// One row of the built-in definition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinProperty {
    /// Attribute name as written in formulas.
    pub name: &'static str,
    /// Declared type string.
    pub type_name: &'static str,
}

impl BuiltinProperty {
    /// Create a table row.
    pub const fn new(name: &'static str, type_name: &'static str) -> Self {
        Self { name, type_name }
    }
}

/// Slot numbers of the built-in properties.
///
/// The discriminant is the slot index. Precompiled formulas cache these
/// numbers, so variants are only ever appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, IntoPrimitive, TryFromPrimitive)]
#[repr(u16)]
pub enum BuiltinSlot {
    Value = 0,
    Data,
    Consts,
    Type,
    Active,
    Lib,

    TimeInAnimation,
    TimeInAnimationDelta,
    FrameInAnimation,
    Level,

    Animation,
    AvailableAnimations,

    Hitpoints,
    MaxHitpoints,
    Mass,
    Label,
    X,
    Y,
    Xy,
    Z,

    RelativeX,
    RelativeY,
    SpawnedBy,
    SpawnedChildren,

    Parent,
    Pivot,
    Zorder,
    ZsubOrder,

    PreviousY,
    X1,
    X2,
    Y1,
    Y2,
    W,
    H,
    MidX,
    MidY,
    MidXy,
    MidpointX,
    MidpointY,
    MidpointXy,

    SolidRect,
    SolidMidX,
    SolidMidY,
    SolidMidXy,

    ImgMidX,
    ImgMidY,
    ImgMidXy,
    ImgW,
    ImgH,
    ImgWh,
    Front,
    Back,
    Cycle,
    Facing,

    UpsideDown,
    Up,
    Down,
    VelocityX,
    VelocityY,
    VelocityXy,

    VelocityMagnitude,
    VelocityAngle,

    AccelX,
    AccelY,
    AccelXy,
    GravityShift,
    PlatformMotionX,

    Registry,
    Globals,
    Vars,
    Tmp,
    Group,
    Rotate,

    Me,
    SelfObject,

    Red,
    Green,
    Blue,
    Alpha,
    TextAlpha,
    Damage,
    HitBy,

    Distortion,
    IsStanding,
    StandingInfo,

    NearCliffEdge,
    DistanceToCliff,

    SlopeStandingOn,
    Underwater,

    PreviousWaterBounds,
    WaterBounds,
    WaterObject,

    Driver,
    IsHuman,
    Invincible,

    SoundVolume,
    Destroyed,
    IsStandingOnPlatform,
    StandingOn,

    Shader,
    Effects,
    Variations,

    AttachedObjects,
    CallStack,
    Lights,

    SolidDimensionsIn,
    SolidDimensionsNotIn,

    CollideDimensionsIn,
    CollideDimensionsNotIn,

    Brightness,
    CurrentGenerator,
    Tags,
    DrawArea,
    Scale,

    ActivationArea,
    ClipArea,

    AlwaysActive,
    ActivationBorder,
    FallThroughPlatforms,
    HasFeet,

    XSchedule,
    YSchedule,
    RotationSchedule,
    ScheduleSpeed,

    ScheduleExpires,

    PlatformArea,
    PlatformOffsets,
    CustomDraw,

    UvArray,
    XyArray,
    UvSegments,

    DrawPrimitives,
    EventHandlers,

    UseAbsoluteScreenCoordinates,

    Widgets,
    Textv,
    Body,
    Paused,
    MouseoverDelay,
    MouseoverArea,

    CtrlUp,
    CtrlDown,
    CtrlLeft,
    CtrlRight,

    CtrlAttack,
    CtrlJump,
    CtrlTongue,
}

impl BuiltinSlot {
    /// Number of built-in slots the engine is compiled against.
    pub const COUNT: usize = BuiltinSlot::CtrlTongue as usize + 1;

    /// Slots whose names are checked against the table at construction,
    /// because schema construction rebinds them by position.
    pub const DESIGNATED: [(BuiltinSlot, &'static str); 5] = [
        (BuiltinSlot::Lib, "lib"),
        (BuiltinSlot::Level, "level"),
        (BuiltinSlot::Parent, "parent"),
        (BuiltinSlot::Me, "me"),
        (BuiltinSlot::SelfObject, "self"),
    ];

    /// The slot index.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The slot with this index, if it is a built-in one.
    pub fn from_index(index: usize) -> Option<Self> {
        u16::try_from(index)
            .ok()
            .and_then(|raw| BuiltinSlot::try_from(raw).ok())
    }

    /// The table row for this slot.
    pub fn property(self) -> Option<&'static BuiltinProperty> {
        BUILTIN_PROPERTIES.get(self.index())
    }
}

/// Every built-in property, in slot order.
pub static BUILTIN_PROPERTIES: &[BuiltinProperty] = &[
    BuiltinProperty::new("value", "any"),
    BuiltinProperty::new("_data", "any"),
    BuiltinProperty::new("consts", "any"),
    BuiltinProperty::new("type", "any"),
    BuiltinProperty::new("active", "any"),
    BuiltinProperty::new("lib", "any"),

    BuiltinProperty::new("time_in_animation", "int"),
    BuiltinProperty::new("time_in_animation_delta", "int"),
    BuiltinProperty::new("frame_in_animation", "int"),
    BuiltinProperty::new("level", "any"),

    BuiltinProperty::new("animation", "string"),
    BuiltinProperty::new("available_animations", "[string]"),

    BuiltinProperty::new("hitpoints", "int"),
    BuiltinProperty::new("max_hitpoints", "int"),
    BuiltinProperty::new("mass", "int"),
    BuiltinProperty::new("label", "string"),
    BuiltinProperty::new("x", "int"),
    BuiltinProperty::new("y", "int"),
    BuiltinProperty::new("xy", "[int]"),
    BuiltinProperty::new("z", "int"),

    BuiltinProperty::new("relative_x", "int"),
    BuiltinProperty::new("relative_y", "int"),
    BuiltinProperty::new("spawned_by", "null|custom_obj"),
    BuiltinProperty::new("spawned_children", "[custom_obj]"),

    BuiltinProperty::new("parent", "null|custom_obj"),
    BuiltinProperty::new("pivot", "string"),
    BuiltinProperty::new("zorder", "int"),
    BuiltinProperty::new("zsub_order", "int"),

    BuiltinProperty::new("previous_y", "int"),
    BuiltinProperty::new("x1", "int"),
    BuiltinProperty::new("x2", "int"),
    BuiltinProperty::new("y1", "int"),
    BuiltinProperty::new("y2", "int"),
    BuiltinProperty::new("w", "int"),
    BuiltinProperty::new("h", "int"),
    BuiltinProperty::new("mid_x", "int"),
    BuiltinProperty::new("mid_y", "int"),
    BuiltinProperty::new("mid_xy", "int"),
    BuiltinProperty::new("midpoint_x", "int"),
    BuiltinProperty::new("midpoint_y", "int"),
    BuiltinProperty::new("midpoint_xy", "int"),

    BuiltinProperty::new("solid_rect", "object"),
    BuiltinProperty::new("solid_mid_x", "int"),
    BuiltinProperty::new("solid_mid_y", "int"),
    BuiltinProperty::new("solid_mid_xy", "int"),

    BuiltinProperty::new("img_mid_x", "int"),
    BuiltinProperty::new("img_mid_y", "int"),
    BuiltinProperty::new("img_mid_xy", "int"),
    BuiltinProperty::new("img_w", "int"),
    BuiltinProperty::new("img_h", "int"),
    BuiltinProperty::new("img_wh", "int"),
    BuiltinProperty::new("front", "int"),
    BuiltinProperty::new("back", "int"),
    BuiltinProperty::new("cycle", "int"),
    BuiltinProperty::new("facing", "int"),

    BuiltinProperty::new("upside_down", "int"),
    BuiltinProperty::new("up", "int"),
    BuiltinProperty::new("down", "int"),
    BuiltinProperty::new("velocity_x", "int"),
    BuiltinProperty::new("velocity_y", "int"),
    BuiltinProperty::new("velocity_xy", "int"),

    BuiltinProperty::new("velocity_magnitude", "decimal"),
    BuiltinProperty::new("velocity_angle", "decimal"),

    BuiltinProperty::new("accel_x", "int"),
    BuiltinProperty::new("accel_y", "int"),
    BuiltinProperty::new("accel_xy", "int"),
    BuiltinProperty::new("gravity_shift", "int"),
    BuiltinProperty::new("platform_motion_x", "int"),

    BuiltinProperty::new("registry", "object"),
    BuiltinProperty::new("globals", "object"),
    BuiltinProperty::new("vars", "object"),
    BuiltinProperty::new("tmp", "object"),
    BuiltinProperty::new("group", "int"),
    BuiltinProperty::new("rotate", "decimal"),

    BuiltinProperty::new("me", "any"),
    BuiltinProperty::new("self", "any"),

    BuiltinProperty::new("red", "int"),
    BuiltinProperty::new("green", "int"),
    BuiltinProperty::new("blue", "int"),
    BuiltinProperty::new("alpha", "int"),
    BuiltinProperty::new("text_alpha", "int"),
    BuiltinProperty::new("damage", "int"),
    BuiltinProperty::new("hit_by", "null|custom_obj"),

    BuiltinProperty::new("distortion", "null|object"),
    BuiltinProperty::new("is_standing", "bool"),
    BuiltinProperty::new("standing_info", "null|object"),

    BuiltinProperty::new("near_cliff_edge", "bool"),
    BuiltinProperty::new("distance_to_cliff", "int"),

    BuiltinProperty::new("slope_standing_on", "int"),
    BuiltinProperty::new("underwater", "bool"),

    BuiltinProperty::new("previous_water_bounds", "[int]"),
    BuiltinProperty::new("water_bounds", "null|[int]"),
    BuiltinProperty::new("water_object", "null|custom_obj"),

    BuiltinProperty::new("driver", "null|custom_obj"),
    BuiltinProperty::new("is_human", "bool"),
    BuiltinProperty::new("invincible", "bool"),

    BuiltinProperty::new("sound_volume", "int"),
    BuiltinProperty::new("destroyed", "bool"),
    BuiltinProperty::new("is_standing_on_platform", "null|bool|custom_obj"),
    BuiltinProperty::new("standing_on", "null|custom_obj"),

    BuiltinProperty::new("shader", "null|object"),
    BuiltinProperty::new("effects", "any"),
    BuiltinProperty::new("variations", "[string]"),

    BuiltinProperty::new("attached_objects", "[custom_obj]"),
    BuiltinProperty::new("call_stack", "[string]"),
    BuiltinProperty::new("lights", "[object]"),

    BuiltinProperty::new("solid_dimensions_in", "[int]"),
    BuiltinProperty::new("solid_dimensions_not_in", "[int]"),

    BuiltinProperty::new("collide_dimensions_in", "[int]"),
    BuiltinProperty::new("collide_dimensions_not_in", "[int]"),

    BuiltinProperty::new("brightness", "int"),
    BuiltinProperty::new("current_generator", "object"),
    BuiltinProperty::new("tags", "object"),
    BuiltinProperty::new("draw_area", "any"),
    BuiltinProperty::new("scale", "decimal"),

    BuiltinProperty::new("activation_area", "null|[int]"),
    BuiltinProperty::new("clip_area", "null|[int]"),

    BuiltinProperty::new("always_active", "bool"),
    BuiltinProperty::new("activation_border", "int"),
    BuiltinProperty::new("fall_through_platforms", "any"),
    BuiltinProperty::new("has_feet", "bool"),

    BuiltinProperty::new("x_schedule", "any"),
    BuiltinProperty::new("y_schedule", "any"),
    BuiltinProperty::new("rotation_schedule", "any"),
    BuiltinProperty::new("schedule_speed", "any"),

    BuiltinProperty::new("schedule_expires", "any"),

    BuiltinProperty::new("platform_area", "null|[int]"),
    BuiltinProperty::new("platform_offsets", "[int]"),
    BuiltinProperty::new("custom_draw", "list"),

    BuiltinProperty::new("uv_array", "[decimal]"),
    BuiltinProperty::new("xy_array", "[decimal]"),
    BuiltinProperty::new("uv_segments", "[int]"),

    BuiltinProperty::new("draw_primitives", "[object]"),
    BuiltinProperty::new("event_handlers", "any"),

    BuiltinProperty::new("use_absolute_screen_coordinates", "bool"),

    BuiltinProperty::new("widgets", "any"),
    BuiltinProperty::new("textv", "any"),
    BuiltinProperty::new("body", "any"),
    BuiltinProperty::new("paused", "any"),
    BuiltinProperty::new("mouseover_delay", "any"),
    BuiltinProperty::new("mouseover_area", "any"),

    BuiltinProperty::new("ctrl_up", "any"),
    BuiltinProperty::new("ctrl_down", "any"),
    BuiltinProperty::new("ctrl_left", "any"),
    BuiltinProperty::new("ctrl_right", "any"),

    BuiltinProperty::new("ctrl_attack", "any"),
    BuiltinProperty::new("ctrl_jump", "any"),
    BuiltinProperty::new("ctrl_tongue", "any"),
];
